//! INR number and statement-date parsing helpers.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Parse an INR-formatted figure: thousands separators stripped,
/// parenthesized or minus-prefixed values negative. Returns `None` on
/// anything that is not a number.
pub fn parse_inr(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    let negative = cleaned.starts_with('(') || cleaned.starts_with('-');
    let digits = cleaned.trim_matches(|c| c == '(' || c == ')' || c == '-');
    let value = Decimal::from_str(digits).ok()?;
    Some(if negative { -value } else { value })
}

/// Parse a statement date such as `25-Nov-2001`. Depository statements
/// occasionally print numeric months (`25-11-2001`), so both forms are
/// accepted.
pub fn parse_statement_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d-%b-%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d-%m-%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_inr_formats() {
        assert_eq!(parse_inr("9,999.50"), Some(d("9999.50")));
        assert_eq!(parse_inr("(1,234.00)"), Some(d("-1234.00")));
        assert_eq!(parse_inr("-50.166"), Some(d("-50.166")));
        assert_eq!(parse_inr("0.50"), Some(d("0.50")));
        assert_eq!(parse_inr(""), None);
        assert_eq!(parse_inr("N/A"), None);
    }

    #[test]
    fn test_parse_statement_date_formats() {
        assert_eq!(
            parse_statement_date("25-Nov-2001"),
            NaiveDate::from_ymd_opt(2001, 11, 25)
        );
        assert_eq!(
            parse_statement_date("01-04-2024"),
            NaiveDate::from_ymd_opt(2024, 4, 1)
        );
        assert_eq!(parse_statement_date("31-Feb-2024"), None);
    }
}
