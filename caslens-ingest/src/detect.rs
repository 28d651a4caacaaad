//! Statement classification: which issuer produced the document and whether
//! it is a detailed transaction history, a point-in-time summary, or a
//! depository holdings statement.

use caslens_core::error::{CasError, Result};
use caslens_core::types::{Issuer, StatementMode, StatementPeriod};

use crate::numbers::parse_statement_date;
use crate::patterns;

/// Decide the issuer from first-page block text. Signatures are checked in a
/// fixed priority order; first match wins.
pub fn detect_issuer(first_page_blocks: &[String]) -> Result<Issuer> {
    for block in first_page_blocks {
        let block = block.trim();
        if block.contains("CAMSCASWS") {
            return Ok(Issuer::Cams);
        }
        if block.contains("KFINCASWS") {
            return Ok(Issuer::Kfintech);
        }
        if block.contains("NSDL Consolidated Account Statement") || block.contains("About NSDL") {
            return Ok(Issuer::Nsdl);
        }
        if block.contains("Central Depository Services (India) Limited") {
            return Ok(Issuer::Cdsl);
        }
    }
    Err(CasError::UnknownStatementType(
        "no issuer signature on first page".into(),
    ))
}

/// Decide the statement mode. Depository issuers always carry holdings;
/// CAMS/KFintech distinguish detailed vs summary in their title line.
pub fn detect_mode(issuer: Issuer, first_page_blocks: &[String]) -> Result<StatementMode> {
    if issuer.is_depository() {
        return Ok(StatementMode::Depository);
    }
    for block in first_page_blocks {
        if let Some(caps) = patterns::CAS_TYPE.captures(block) {
            return match caps.get(1).map(|m| m.as_str().to_lowercase()) {
                Some(kind) if kind == "statement" => Ok(StatementMode::Detailed),
                Some(kind) if kind == "summary" => Ok(StatementMode::Summary),
                _ => Err(CasError::UnknownStatementType(
                    "unrecognized statement title".into(),
                )),
            };
        }
    }
    Err(CasError::UnknownStatementType(
        "no statement/summary title on first page".into(),
    ))
}

/// Extract the statement period from the document's reconstructed text.
/// Its absence is a structural error: without a period the valuation
/// snapshot cannot be pinned.
pub fn statement_period(text: &str, mode: StatementMode) -> Result<StatementPeriod> {
    let (from_raw, to_raw) = match mode {
        StatementMode::Detailed => {
            let caps = patterns::DETAILED_PERIOD
                .captures(text)
                .ok_or(CasError::MissingStatementPeriod)?;
            (caps[1].to_string(), caps[2].to_string())
        }
        StatementMode::Summary => {
            let caps = patterns::SUMMARY_PERIOD
                .captures(text)
                .ok_or(CasError::MissingStatementPeriod)?;
            (caps[1].to_string(), caps[1].to_string())
        }
        StatementMode::Depository => {
            let caps = patterns::DEPOSITORY_PERIOD
                .captures(text)
                .ok_or(CasError::MissingStatementPeriod)?;
            (caps[1].to_string(), caps[2].to_string())
        }
    };

    let from = parse_statement_date(&from_raw).ok_or_else(|| CasError::BadDate(from_raw))?;
    let to = parse_statement_date(&to_raw).ok_or_else(|| CasError::BadDate(to_raw))?;
    Ok(StatementPeriod { from, to })
}
