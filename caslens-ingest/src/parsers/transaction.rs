//! Transaction-row parsing for detailed statements.
//!
//! A reconstructed line may carry several date-anchored transactions back to
//! back (a tax row immediately followed by the purchase it belongs to). The
//! line is split at date boundaries, each segment divided into description
//! text and a trailing numeric run, and incomplete rows are resolved against
//! the page's column map by word x-position.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use caslens_core::classify_transaction;
use caslens_core::types::Transaction;

use crate::layout::{Column, ColumnMap, Line, Tolerances, Word};
use crate::numbers::parse_inr;
use crate::patterns;

/// Parse every transaction encoded in `line`. Lines that do not start with a
/// date, or whose body carries a colon (prose like "15-Sep-2025: 1%
/// redeemed..."), yield nothing.
pub fn parse_transaction_line(
    line: &Line,
    columns: &ColumnMap,
    tolerances: &Tolerances,
) -> Vec<Transaction> {
    let text = line.text.as_str();
    let date_matches: Vec<_> = patterns::TXN_DATE.find_iter(text).collect();
    if date_matches.is_empty() || date_matches[0].start() != 0 {
        return Vec::new();
    }

    let mut claimed: Vec<usize> = Vec::new();
    let mut out = Vec::new();
    for (i, date_match) in date_matches.iter().enumerate() {
        let end = date_matches
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(text.len());
        let body = text[date_match.end()..end].trim();
        if body.contains(':') {
            continue;
        }
        let Some(date) = crate::numbers::parse_statement_date(date_match.as_str()) else {
            continue;
        };
        if let Some(txn) = parse_segment(date, body, line, columns, tolerances, &mut claimed) {
            out.push(txn);
        }
    }
    out
}

fn parse_segment(
    date: NaiveDate,
    body: &str,
    line: &Line,
    columns: &ColumnMap,
    tolerances: &Tolerances,
    claimed: &mut Vec<usize>,
) -> Option<Transaction> {
    let caps = patterns::DESCRIPTION_SPLIT.captures(body)?;
    let description = caps.get(1)?.as_str().trim().to_string();
    let numeric_run = caps.get(2)?.as_str();

    let tokens: Vec<&str> = patterns::NUMERIC_TOKEN
        .find_iter(numeric_run)
        .map(|m| m.as_str())
        .collect();
    if tokens.is_empty() {
        return None;
    }

    let (amount, units, nav, balance) = if tokens.len() >= 4 {
        (
            parse_inr(tokens[0]),
            parse_inr(tokens[1]),
            parse_inr(tokens[2]),
            parse_inr(tokens[3]),
        )
    } else {
        assign_by_column(&tokens, line, columns, tolerances, claimed)
    };

    let (txn_type, dividend_rate) = classify_transaction(&description, units);
    Some(Transaction::new(
        date,
        description,
        txn_type,
        amount,
        units,
        nav,
        balance,
        dividend_rate,
    ))
}

type ColumnValues = (
    Option<Decimal>,
    Option<Decimal>,
    Option<Decimal>,
    Option<Decimal>,
);

/// Resolve an incomplete numeric run by locating each token's source word
/// and matching its x-range against the page's named columns. Matched word
/// indices are recorded in `claimed` so repeated identical values on a
/// crowded line are not assigned twice. Tokens landing in no column are
/// dropped.
fn assign_by_column(
    tokens: &[&str],
    line: &Line,
    columns: &ColumnMap,
    tolerances: &Tolerances,
    claimed: &mut Vec<usize>,
) -> ColumnValues {
    let mut amount = None;
    let mut units = None;
    let mut nav = None;
    let mut balance = None;

    for token in tokens {
        let Some((idx, word)) = find_word(line, token, claimed) else {
            continue;
        };
        for column in Column::ALL {
            let Some(header) = columns.get(column) else {
                continue;
            };
            let within = word.rect.x0 >= header.x0 - tolerances.column_left
                && word.rect.x1 <= header.x1 + tolerances.column_right;
            if !within {
                continue;
            }
            let slot = match column {
                Column::Amount => &mut amount,
                Column::Units => &mut units,
                Column::Nav => &mut nav,
                Column::Balance => &mut balance,
            };
            if slot.is_none() {
                *slot = parse_inr(token);
                claimed.push(idx);
                break;
            }
        }
    }

    (amount, units, nav, balance)
}

fn find_word<'a>(line: &'a Line, token: &str, claimed: &[usize]) -> Option<(usize, &'a Word)> {
    line.words
        .iter()
        .enumerate()
        .find(|(idx, w)| !claimed.contains(idx) && w.text.contains(token))
}
