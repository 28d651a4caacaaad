//! Extraction grammars, one compiled static per rule.
//!
//! Grouped by dialect: CAMS/KFintech detailed, CAMS/KFintech summary, and
//! the NSDL/CDSL depository shapes. Patterns operate on reconstructed lines
//! (single spaces between words), except the depository account headers
//! which are also matched over the whole joined document text.

use std::sync::LazyLock;

use regex::Regex;

const DATE: &str = r"(\d{2}-[A-Za-z]{3}-\d{4})";
const AMT: &str = r"([(-]*\d[\d,.]+)\)*";
const ISIN: &str = r"[A-Z]{2}[0-9A-Z]{9}[0-9]";

fn build(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid extraction pattern")
}

// --- classification ---

pub static CAS_TYPE: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)consolidated\s+account\s+(statement|summary)"));

// --- statement period ---

pub static DETAILED_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| build(&format!(r"(?i){DATE}\s+to\s+{DATE}")));

pub static SUMMARY_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| build(&format!(r"(?i)as\s+on\s+{DATE}")));

pub static DEPOSITORY_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i)for\s+the\s+period\s+from\s+(\d{2}-[a-zA-Z0-9]{2,3}-\d{4})\s+to\s+(\d{2}-[a-zA-Z0-9]{2,3}-\d{4})",
    )
});

// --- CAMS/KFintech detailed mode ---

pub static AMC: LazyLock<Regex> = LazyLock::new(|| {
    build(r"(?i)^(.+?\s+(MF|Mutual\s*Fund)|franklin\s+templeton\s+investments)$")
});

pub static FOLIO: LazyLock<Regex> = LazyLock::new(|| build(r"Folio\s+No\s*:\s+([\d/\s]+\d)\s"));

pub static PAN: LazyLock<Regex> = LazyLock::new(|| build(r"PAN\s*:\s*([A-Z]{5}\d{4}[A-Z])"));

pub static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)(?P<code>\w+)\s*-\s*\d*\s*(?P<name>.+?)(?:\(Advi|ISIN).*$"));

pub static SCHEME_METADATA: LazyLock<Regex> =
    LazyLock::new(|| build(r"([A-Za-z]+)\s*:\s*([-\w]+(?:\s+[-\w]+)*)"));

pub static ISIN_CODE: LazyLock<Regex> = LazyLock::new(|| build(&format!(r"({ISIN})")));

pub static REGISTRAR: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)Registrar\s*:\s*(.+?)(?:\s\s|$)"));

pub static REGISTRAR_BOILERPLATE: LazyLock<Regex> =
    LazyLock::new(|| build(r"Registrar\s*:\s*CAMS"));

/// Marks one `Nominee N:` segment; a line may enumerate several.
pub static NOMINEE_MARK: LazyLock<Regex> = LazyLock::new(|| build(r"(?i)Nominee\s*\d+\s*:"));

pub static OPEN_UNITS: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)Opening\s+Unit\s+Balance.+?([\d,.]+)"));

pub static CLOSE_UNITS: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)Closing\s+Unit\s+Balance.+?([\d,.]+)"));

pub static COST: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)Total\s+Cost\s+Value\s*:.+?(?:INR\s*)?([\d,.]+)"));

pub static VALUATION: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?i)(?:Valuation|Market\s+Value)\s+on\s+{DATE}\s*:\s*INR\s*([\d,.]+)"
    ))
});

pub static NAV: LazyLock<Regex> =
    LazyLock::new(|| build(&format!(r"(?i)NAV\s+on\s+{DATE}\s*:\s*INR\s*([\d,.]+)")));

/// Anchors transaction segments within a line; segment splitting itself is
/// done by scanning date matches (see `parsers::transaction`).
pub static TXN_DATE: LazyLock<Regex> = LazyLock::new(|| build(DATE));

/// Splits a transaction segment into description text and the trailing run
/// of decimal-formatted numeric tokens.
pub static DESCRIPTION_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| build(r"^(.*?)\s+((?:[(-]*[\d,]+\.\d+\)*\s*)+)"));

pub static NUMERIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| build(r"[(-]*[\d,]+\.\d+\)*"));

/// Name suffixes stripped during scheme-name cleanup.
pub static FORMERLY: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)\((formerly|erstwhile).+?\)"));

pub static DEMAT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| build(r"(?i)\((Demat|Non-Demat).*"));

pub static TRAILING_JUNK: LazyLock<Regex> = LazyLock::new(|| build(r"[^a-zA-Z0-9_)]+$"));

pub static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| build(r"\s+"));

// --- CAMS/KFintech summary mode ---

pub static SUMMARY_ROW: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"(?P<folio>[\d/\s]+?)?(?P<isin>{ISIN})\s+(?P<code>[ \w]+)-(?P<name>.+?)\s+(?P<cost>[\d,.]+)?\s+(?P<balance>[\d,.]+)\s*(?P<date>\d{{2}}-[A-Za-z]{{3}}-\d{{4}})\s*(?P<nav>[\d,.]+)\s*(?P<value>[\d,.]+)\s*(?P<rta>\w+)\s*$"
    ))
});

pub static SUMMARY_TOTAL: LazyLock<Regex> = LazyLock::new(|| build(r"(?i)Total"));

// --- NSDL/CDSL depository mode ---

pub static DEMAT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    build(
        r"(?i)((?:CDSL|NSDL)\s+demat\s+account)\s+(.+?)\s*DP\s*Id\s*:\s*(.+?)\s*Client\s*Id\s*:\s*(\d+)\s+(\d+)\s+([\d,.]+)",
    )
});

pub static DEMAT_MF_HEADER: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)Mutual Fund Folios\s+(\d+)\s+folios\s+(\d+)\s+([\d,.]+)"));

pub static DEMAT_AC_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    build(r"(?i)^(NSDL|CDSL)\s+demat\s+account|Mutual\s+Fund\s+Folios\s+\(F\)")
});

pub static DEMAT_MF_TYPE: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)^Mutual\s+Fund\s+Folios\s+\(F\)$"));

pub static DEMAT_AC_HOLDER: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)([^\t\n]+?)\s*\(PAN\s*:\s*(.+?)\)"));

pub static DEMAT_DP_ID: LazyLock<Regex> =
    LazyLock::new(|| build(r"(?i)DP\s*Id\s*:\s*(.+?)\s*Client\s*Id\s*:\s*(\d+).+PAN"));

pub static NSDL_EQ: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"^([A-Z]{{2}}[E9][0-9A-Z]{{8}}[0-9])\s*(.+?)\s*{AMT}\s+([\d,.]+)\s+{AMT}\s+{AMT}$"
    ))
});

pub static NSDL_MF: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"^(INF[0-9A-Z]{{8}}[0-9])\s*(.*?)\s*{AMT}\s+{AMT}\s+{AMT}$"
    ))
});

/// CDSL prints equities and mutual funds through one unified row shape;
/// holdings are told apart downstream by ISIN prefix (INE equity, INF fund).
pub static CDSL_HOLDINGS: LazyLock<Regex> = LazyLock::new(|| {
    let amts = format!(r"{AMT}\s+").repeat(10);
    build(&format!(r"^({ISIN})\s*(.+?)\s+{amts}{AMT}$"))
});

/// Mutual-fund folio rows keep their tab delimiters through extraction.
pub static MF_FOLIO_ROW: LazyLock<Regex> = LazyLock::new(|| {
    build(&format!(
        r"^(INF[0-9A-Z]{{8}}[0-9])\t+(.+?)\t+(\w+)\t+{AMT}\t+{AMT}\t+{AMT}\t+{AMT}\t+{AMT}\t+{AMT}(?:\t+{AMT})?$"
    ))
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folio_pattern_captures_number() {
        let caps = FOLIO.captures("Folio No : 12345678 / 90 PAN : ABCDE1234F").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str().trim(), "12345678 / 90");
    }

    #[test]
    fn test_scheme_pattern_stops_at_advisor_or_isin() {
        let line = "128TSDGG-HDFC Top 100 Fund - Growth - ISIN: INF179K01BE2(Advisor: ARN-0845)";
        let caps = SCHEME.captures(line).unwrap();
        assert_eq!(caps.name("code").unwrap().as_str(), "128TSDGG");
        assert!(caps.name("name").unwrap().as_str().starts_with("HDFC Top 100"));
    }

    #[test]
    fn test_summary_row_pattern() {
        let line = "12345678 INF179K01BE2 128TSD-HDFC Top 100 Fund - Growth 10,000.00 50.166 30-Jun-2024 209.3270 10,500.00 CAMS";
        let caps = SUMMARY_ROW.captures(line).unwrap();
        assert_eq!(caps.name("isin").unwrap().as_str(), "INF179K01BE2");
        assert_eq!(caps.name("rta").unwrap().as_str(), "CAMS");
        assert_eq!(caps.name("balance").unwrap().as_str(), "50.166");
    }

    #[test]
    fn test_demat_header_captures_account_identity() {
        let text = "NSDL demat account Ram Kumar DP Id : IN300100 Client Id : 12345678 3 1,23,456.00";
        let caps = DEMAT_HEADER.captures(text).unwrap();
        assert_eq!(caps.get(3).unwrap().as_str(), "IN300100");
        assert_eq!(caps.get(4).unwrap().as_str(), "12345678");
    }

    #[test]
    fn test_nsdl_equity_row() {
        let line = "INE123A01016 Reliance Industries Ltd 10.000 10 2,500.00 25,000.00";
        let caps = NSDL_EQ.captures(line).unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "INE123A01016");
        assert_eq!(caps.get(4).unwrap().as_str(), "10");
    }

    #[test]
    fn test_valuation_and_nav_patterns() {
        let line = "Closing Unit Balance: 50.166 NAV on 30-Jun-2024: INR 209.3270";
        assert!(CLOSE_UNITS.is_match(line));
        let caps = NAV.captures(line).unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "30-Jun-2024");
        assert_eq!(caps.get(2).unwrap().as_str(), "209.3270");
    }
}
