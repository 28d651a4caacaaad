//! Summary-mode extraction: one tabular row per scheme, no transactions.

use caslens_core::error::Result;
use caslens_core::types::{Scheme, SchemeValuation, StatementPeriod};

use crate::numbers::{parse_inr, parse_statement_date};
use crate::parsers::detailed::clean_scheme_name;
use crate::parsers::PageContent;
use crate::patterns;

/// Walk the document and emit one scheme per summary row. Wrapped scheme
/// names spill onto their own line with no other recognizable content and
/// are appended to the open scheme; a "Total" line ends processing.
pub fn parse_summary(pages: &[PageContent], period: &StatementPeriod) -> Result<Vec<Scheme>> {
    let mut schemes: Vec<Scheme> = Vec::new();
    let mut current_folio: Option<String> = None;
    let mut current_scheme: Option<Scheme> = None;

    'lines: for page in pages {
        for line in &page.lines {
            let text = line.text.as_str();

            let seen_any = !schemes.is_empty() || current_scheme.is_some();
            if seen_any && patterns::SUMMARY_TOTAL.is_match(text) {
                break 'lines;
            }

            if let Some(caps) = patterns::SUMMARY_ROW.captures(text) {
                if let Some(scheme) = current_scheme.take() {
                    schemes.push(scheme);
                }

                if let Some(folio) = caps.name("folio") {
                    let folio = folio.as_str().trim().to_string();
                    if current_folio.as_deref() != Some(folio.as_str()) {
                        current_folio = Some(folio);
                    }
                }

                let balance = caps
                    .name("balance")
                    .and_then(|m| parse_inr(m.as_str()))
                    .unwrap_or_default();
                let valuation_date = caps
                    .name("date")
                    .and_then(|m| parse_statement_date(m.as_str()))
                    .unwrap_or(period.to);

                current_scheme = Some(Scheme {
                    scheme_name: clean_scheme_name(&caps["name"]),
                    folio: current_folio.clone(),
                    pan: None,
                    amc: None,
                    advisor: None,
                    rta: Some(caps["rta"].trim().to_string()),
                    rta_code: Some(caps["code"].trim().to_string()),
                    isin: Some(caps["isin"].to_string()),
                    open: balance,
                    close: balance,
                    close_calculated: balance,
                    valuation: SchemeValuation {
                        date: valuation_date,
                        nav: caps.name("nav").and_then(|m| parse_inr(m.as_str())),
                        cost: caps.name("cost").and_then(|m| parse_inr(m.as_str())),
                        value: caps.name("value").and_then(|m| parse_inr(m.as_str())),
                    },
                    nominees: Vec::new(),
                    transactions: Vec::new(),
                });
                continue;
            }

            // Wrapped name tail: no row match, no total marker.
            if let Some(scheme) = current_scheme.as_mut() {
                let tail = text.trim();
                if !tail.is_empty() {
                    scheme.scheme_name = format!("{} {}", scheme.scheme_name, tail);
                }
            }
        }
    }

    if let Some(scheme) = current_scheme.take() {
        schemes.push(scheme);
    }
    Ok(schemes)
}
