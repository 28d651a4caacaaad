//! End-to-end: word boxes in, structured statement out.

use std::str::FromStr;

use caslens_core::{CasError, Issuer, StatementBody, StatementMode, TransactionType};
use caslens_ingest::{parse_document, Document, Page, Rect, Word};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn w(x0: f64, x1: f64, y: f64, text: &str) -> Word {
    Word::new(Rect::new(x0, y, x1, y + 10.0), text)
}

/// Lay a row of words left to right at a fixed baseline.
fn row(y: f64, texts: &[&str]) -> Vec<Word> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| w(10.0 + 45.0 * i as f64, 45.0 + 45.0 * i as f64, y, t))
        .collect()
}

/// A one-page CAMS detailed statement: one folio, one scheme, a four-column
/// SIP purchase row and a stamp-duty row whose single figure is resolved
/// through the Amount column's x-range.
fn cams_detailed_document() -> Document {
    let mut words = Vec::new();
    words.extend(row(0.0, &["01-Apr-2023", "To", "31-Mar-2024"]));
    words.extend(row(20.0, &["HDFC", "Mutual", "Fund"]));
    words.extend(row(
        40.0,
        &["Folio", "No", ":", "12345678", "PAN", ":", "ABCDE1234F"],
    ));
    words.extend(row(
        60.0,
        &[
            "128TSDGG-HDFC",
            "Top",
            "100",
            "Fund",
            "-",
            "Growth",
            "-",
            "ISIN:",
            "INF179K01BE2(Advisor:",
            "ARN-0845)",
            "Registrar",
            ":",
            "CAMS",
        ],
    ));
    // Transaction table header: the column boxes below drive the x-range
    // assignment for incomplete rows.
    words.push(w(10.0, 40.0, 80.0, "Date"));
    words.push(w(50.0, 110.0, 80.0, "Transaction"));
    words.push(w(200.0, 235.0, 80.0, "Amount"));
    words.push(w(260.0, 290.0, 80.0, "Units"));
    words.push(w(310.0, 335.0, 80.0, "NAV"));
    words.push(w(360.0, 400.0, 80.0, "Balance"));
    words.extend(row(100.0, &["Opening", "Unit", "Balance:", "0.000"]));
    words.extend(row(
        120.0,
        &[
            "01-Apr-2023",
            "SIP",
            "Purchase",
            "Instalment",
            "No",
            "1",
            "10,000.00",
            "50.166",
            "199.3400",
            "50.166",
        ],
    ));
    words.push(w(10.0, 60.0, 140.0, "01-Apr-2023"));
    words.push(w(65.0, 80.0, 140.0, "***"));
    words.push(w(85.0, 110.0, 140.0, "Stamp"));
    words.push(w(115.0, 135.0, 140.0, "Duty"));
    words.push(w(140.0, 155.0, 140.0, "***"));
    words.push(w(205.0, 230.0, 140.0, "5.00"));
    words.extend(row(
        160.0,
        &[
            "Closing",
            "Unit",
            "Balance:",
            "50.166",
            "Total",
            "Cost",
            "Value",
            ":",
            "INR",
            "10,000.00",
            "Valuation",
            "on",
            "31-Mar-2024:",
            "INR",
            "10,500.00",
        ],
    ));
    words.extend(row(180.0, &["NAV", "on", "31-Mar-2024:", "INR", "209.3270"]));

    Document {
        first_page_blocks: vec![
            "CAMSCASWS".to_string(),
            "Consolidated Account Statement".to_string(),
        ],
        pages: vec![Page { words }],
        investor_info: None,
    }
}

#[test]
fn test_cams_detailed_statement_end_to_end() {
    let parsed = parse_document(&cams_detailed_document()).unwrap();

    assert_eq!(parsed.metadata.issuer, Issuer::Cams);
    assert_eq!(parsed.metadata.mode, StatementMode::Detailed);
    assert_eq!(
        parsed.metadata.period.from,
        NaiveDate::from_ymd_opt(2023, 4, 1).unwrap()
    );
    assert_eq!(
        parsed.metadata.period.to,
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    );

    let StatementBody::Schemes(schemes) = &parsed.body else {
        panic!("detailed statement must yield schemes");
    };
    assert_eq!(schemes.len(), 1);

    let scheme = &schemes[0];
    assert_eq!(scheme.scheme_name, "HDFC Top 100 Fund - Growth");
    assert_eq!(scheme.folio.as_deref(), Some("12345678"));
    assert_eq!(scheme.pan.as_deref(), Some("ABCDE1234F"));
    assert_eq!(scheme.amc.as_deref(), Some("HDFC Mutual Fund"));
    assert_eq!(scheme.advisor.as_deref(), Some("ARN-0845"));
    assert_eq!(scheme.rta.as_deref(), Some("CAMS"));
    assert_eq!(scheme.rta_code.as_deref(), Some("128TSDGG"));
    assert_eq!(scheme.isin.as_deref(), Some("INF179K01BE2"));
    assert_eq!(scheme.open, Decimal::ZERO);
    assert_eq!(scheme.close, d("50.166"));
    assert_eq!(scheme.close_calculated, d("50.166"));
    assert_eq!(
        scheme.valuation.date,
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    );
    assert_eq!(scheme.valuation.nav, Some(d("209.3270")));
    assert_eq!(scheme.valuation.cost, Some(d("10000.00")));
    assert_eq!(scheme.valuation.value, Some(d("10500.00")));

    assert_eq!(scheme.transactions.len(), 2);

    let sip = &scheme.transactions[0];
    assert_eq!(sip.txn_type, TransactionType::PurchaseSip);
    assert_eq!(sip.description, "SIP Purchase Instalment No 1");
    assert_eq!(sip.amount, Some(d("10000.00")));
    assert_eq!(sip.units, Some(d("50.166")));
    assert_eq!(sip.nav, Some(d("199.3400")));
    assert_eq!(sip.balance, Some(d("50.166")));

    let stamp = &scheme.transactions[1];
    assert_eq!(stamp.txn_type, TransactionType::StampDutyTax);
    assert_eq!(stamp.amount, Some(d("5.00")));
    assert_eq!(stamp.units, None);
    assert_eq!(stamp.nav, None);
    assert_eq!(stamp.balance, None);
}

#[test]
fn test_serialized_shape_is_stable() {
    let parsed = parse_document(&cams_detailed_document()).unwrap();
    let json = serde_json::to_value(&parsed).unwrap();

    assert_eq!(json["body"]["kind"], "schemes");
    assert_eq!(
        json["body"]["entries"][0]["transactions"][0]["type"],
        "PURCHASE_SIP"
    );
    assert_eq!(
        json["body"]["entries"][0]["transactions"][1]["type"],
        "STAMP_DUTY_TAX"
    );
}

#[test]
fn test_unrecognized_first_page_is_an_error() {
    let document = Document {
        first_page_blocks: vec!["Annual Report 2024".to_string()],
        pages: Vec::new(),
        investor_info: None,
    };
    let err = parse_document(&document).unwrap_err();
    assert!(matches!(err, CasError::UnknownStatementType(_)));
}
