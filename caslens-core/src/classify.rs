//! Transaction-type classification from free-text descriptions.
//!
//! Pure and total: every `(description, units)` pair maps to a type. Rows the
//! grammar cannot place are kept as `UNKNOWN` and logged, never dropped.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::types::TransactionType;

static DIVIDEND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:div\.|dividend|idcw).+?(reinvest)*.*?@\s*Rs\.\s*([\d.]+)(?:\s+per\s+unit)?")
        .expect("valid dividend pattern")
});

static INSTALMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)instal+ment").expect("valid instalment pattern"));

static SYS_INVEST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)sys.+?invest").expect("valid systematic pattern"));

static REVERSAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)reversal|rejection|dishonoured|mismatch|insufficient\s+balance")
        .expect("valid reversal pattern")
});

/// Keywords that mark a zero-unit row as administrative noise.
const MISC_KEYWORDS: [&str; 5] = ["mobile", "address", "details", "nominee", "change"];

/// Classify a transaction by its description text and signed unit quantity.
/// Returns the type and, for dividends, the per-unit rate.
pub fn classify_transaction(
    description: &str,
    units: Option<Decimal>,
) -> (TransactionType, Option<Decimal>) {
    if description.trim().is_empty() {
        return (TransactionType::Unknown, None);
    }
    let description = description.to_lowercase();

    if let Some(caps) = DIVIDEND_RE.captures(&description) {
        let rate = caps
            .get(2)
            .and_then(|m| Decimal::from_str(m.as_str()).ok());
        let txn_type = if caps.get(1).is_some() {
            TransactionType::DividendReinvest
        } else {
            TransactionType::DividendPayout
        };
        return (txn_type, rate);
    }

    // Pure cash rows (no units): taxes and fees.
    let Some(units) = units else {
        if description.contains("stt") {
            return (TransactionType::SttTax, None);
        }
        if description.contains("stamp") {
            return (TransactionType::StampDutyTax, None);
        }
        if description.contains("tds") {
            return (TransactionType::TdsTax, None);
        }
        return (TransactionType::Misc, None);
    };

    if units > Decimal::ZERO {
        if description.contains("switch") {
            return if description.contains("merger") {
                (TransactionType::SwitchInMerger, None)
            } else {
                (TransactionType::SwitchIn, None)
            };
        }
        if description.contains("segregat") {
            return (TransactionType::Segregation, None);
        }
        if description.contains("sip")
            || description.contains("systematic")
            || INSTALMENT_RE.is_match(&description)
            || SYS_INVEST_RE.is_match(&description)
        {
            return (TransactionType::PurchaseSip, None);
        }
        return (TransactionType::Purchase, None);
    }

    if units < Decimal::ZERO {
        if REVERSAL_RE.is_match(&description) {
            return (TransactionType::Reversal, None);
        }
        if description.contains("switch") {
            return if description.contains("merger") {
                (TransactionType::SwitchOutMerger, None)
            } else {
                (TransactionType::SwitchOut, None)
            };
        }
        return (TransactionType::Redemption, None);
    }

    // units == 0
    for keyword in MISC_KEYWORDS {
        if description.contains(keyword) {
            return (TransactionType::Misc, None);
        }
    }

    log::warn!("unclassified transaction: description={description:?} units={units}");
    (TransactionType::Unknown, None)
}
