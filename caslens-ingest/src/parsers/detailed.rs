//! Detailed-mode extraction: the folio → scheme → transaction state machine.
//!
//! Single pass over the document's reconstructed lines (pages concatenated in
//! order — a scheme's transactions can continue onto the next page without a
//! repeated header). Nesting depth is fixed, so the machine carries plain
//! "current" pointers instead of a stack, all owned by one parse call.

use rust_decimal::Decimal;

use caslens_core::error::{CasError, Result};
use caslens_core::types::{Scheme, SchemeValuation, StatementPeriod};

use crate::layout::Tolerances;
use crate::numbers::{parse_inr, parse_statement_date};
use crate::parsers::transaction::parse_transaction_line;
use crate::parsers::PageContent;
use crate::patterns;

struct DetailedState {
    current_folio: Option<String>,
    current_pan: Option<String>,
    current_amc: Option<String>,
    current_registrar: Option<String>,
    current_scheme: Option<Scheme>,
    schemes: Vec<Scheme>,
}

impl DetailedState {
    fn new() -> Self {
        DetailedState {
            current_folio: None,
            current_pan: None,
            current_amc: None,
            current_registrar: None,
            current_scheme: None,
            schemes: Vec::new(),
        }
    }

    fn finalize_scheme(&mut self) {
        if let Some(scheme) = self.current_scheme.take() {
            self.schemes.push(scheme);
        }
    }
}

/// Walk the whole document and emit the scheme list.
pub fn parse_detailed(
    pages: &[PageContent],
    period: &StatementPeriod,
    tolerances: &Tolerances,
) -> Result<Vec<Scheme>> {
    // Flat view with per-line page index: the scheme-name join needs a next
    // line even across a page break, while column lookup stays per page.
    let flat: Vec<(usize, &crate::layout::Line)> = pages
        .iter()
        .enumerate()
        .flat_map(|(page_idx, page)| page.lines.iter().map(move |line| (page_idx, line)))
        .collect();

    let mut state = DetailedState::new();

    for (idx, &(page_idx, line)) in flat.iter().enumerate() {
        let text = line.text.as_str();

        if let Some(amc) = patterns::AMC.find(text) {
            state.current_amc = Some(amc.as_str().trim().to_string());
            continue;
        }

        if let Some(caps) = patterns::FOLIO.captures(text) {
            let folio = normalize_folio(&caps[1]);
            if state.current_folio.as_deref() != Some(folio.as_str()) {
                state.finalize_scheme();
                state.current_folio = Some(folio);
                state.current_pan = patterns::PAN
                    .captures(text)
                    .map(|c| c[1].to_string());
            }
            continue;
        }

        // Long scheme names wrap onto the following raw line, so the header
        // is matched against the joined pair. Nominee lines never precede a
        // wrapped name, which is the one case the join must not cross.
        let joined;
        let scheme_line = match flat.get(idx + 1) {
            Some(&(_, next)) if !patterns::NOMINEE_MARK.is_match(text) => {
                joined = format!("{text} {}", next.text);
                joined.as_str()
            }
            _ => text,
        };
        if let Some(caps) = patterns::SCHEME.captures(scheme_line) {
            open_scheme(&mut state, &caps, scheme_line, period)?;
            // No continue: a registrar fragment can share the scheme line.
        }

        if let Some(caps) = patterns::REGISTRAR.captures(text) {
            let registrar = caps[1].trim().to_string();
            match state.current_scheme.as_mut() {
                Some(scheme) => scheme.rta = Some(registrar),
                None => state.current_registrar = Some(registrar),
            }
            continue;
        }

        let Some(scheme) = state.current_scheme.as_mut() else {
            continue;
        };

        if patterns::NOMINEE_MARK.is_match(text) {
            scheme.nominees.extend(nominee_names(text));
            continue;
        }

        if let Some(caps) = patterns::OPEN_UNITS.captures(text) {
            if let Some(open) = parse_inr(&caps[1]) {
                scheme.open = open;
                scheme.close_calculated = open;
            }
            continue;
        }

        // Closing balance, cost, valuation and NAV are independent
        // sub-matches against the same line.
        if let Some(caps) = patterns::CLOSE_UNITS.captures(text) {
            if let Some(close) = parse_inr(&caps[1]) {
                scheme.close = close;
            }
        }
        if let Some(caps) = patterns::COST.captures(text) {
            scheme.valuation.cost = parse_inr(&caps[1]);
        }
        if let Some(caps) = patterns::VALUATION.captures(text) {
            if let Some(date) = parse_statement_date(&caps[1]) {
                scheme.valuation.date = date;
                scheme.valuation.value = parse_inr(&caps[2]);
            }
        }
        if let Some(caps) = patterns::NAV.captures(text) {
            if let Some(date) = parse_statement_date(&caps[1]) {
                scheme.valuation.date = date;
                scheme.valuation.nav = parse_inr(&caps[2]);
            }
            // NAV lines never carry transactions.
            continue;
        }

        let columns = &pages[page_idx].columns;
        let transactions = parse_transaction_line(line, columns, tolerances);
        for txn in &transactions {
            if let Some(units) = txn.units {
                scheme.close_calculated += units;
            }
        }
        scheme.transactions.extend(transactions);
    }

    state.finalize_scheme();
    Ok(state.schemes)
}

fn open_scheme(
    state: &mut DetailedState,
    caps: &regex::Captures<'_>,
    scheme_line: &str,
    period: &StatementPeriod,
) -> Result<()> {
    if state.current_folio.is_none() {
        return Err(CasError::SchemeBeforeFolio);
    }

    let name = clean_scheme_name(&caps["name"]);
    match &state.current_scheme {
        Some(current) if current.scheme_name == name => return Ok(()),
        Some(_) => state.finalize_scheme(),
        None => {}
    }

    // "Registrar : CAMS" boilerplate lands mid-line on split scheme details
    // and corrupts the key:value scan, so it is stripped first.
    let formatted = patterns::REGISTRAR_BOILERPLATE.replace_all(scheme_line, "");
    let mut advisor = None;
    let mut isin = None;
    for kv in patterns::SCHEME_METADATA.captures_iter(&formatted) {
        let key = kv[1].to_lowercase();
        let value = patterns::WHITESPACE_RUN.replace_all(&kv[2], "").to_string();
        match key.as_str() {
            "advisor" => advisor = Some(value),
            "isin" => {
                isin = Some(
                    patterns::ISIN_CODE
                        .captures(&value)
                        .map(|c| c[1].to_string())
                        .unwrap_or(value),
                );
            }
            _ => {}
        }
    }

    state.current_scheme = Some(Scheme {
        scheme_name: name,
        folio: state.current_folio.clone(),
        pan: state.current_pan.clone(),
        amc: state.current_amc.clone(),
        advisor,
        rta: state.current_registrar.take(),
        rta_code: Some(caps["code"].trim().to_string()),
        isin,
        open: Decimal::ZERO,
        close: Decimal::ZERO,
        close_calculated: Decimal::ZERO,
        valuation: SchemeValuation {
            date: period.to,
            nav: None,
            cost: None,
            value: None,
        },
        nominees: Vec::new(),
        transactions: Vec::new(),
    });
    Ok(())
}

fn normalize_folio(raw: &str) -> String {
    patterns::WHITESPACE_RUN
        .replace_all(raw.trim(), " ")
        .to_string()
}

/// Strip renamed-scheme and demat-form suffixes, collapse whitespace, and
/// drop trailing punctuation from a captured scheme name.
pub fn clean_scheme_name(raw: &str) -> String {
    let name = patterns::FORMERLY.replace_all(raw, "");
    let name = patterns::DEMAT_SUFFIX.replace_all(&name, "");
    let name = patterns::WHITESPACE_RUN.replace_all(name.trim(), " ");
    patterns::TRAILING_JUNK.replace_all(&name, "").trim().to_string()
}

/// Extract every `Nominee N: <name>` segment from a line; several may be
/// enumerated back to back. Segments carrying further key:value text are
/// not names and are skipped.
fn nominee_names(text: &str) -> Vec<String> {
    let marks: Vec<_> = patterns::NOMINEE_MARK.find_iter(text).collect();
    let mut names = Vec::new();
    for (i, mark) in marks.iter().enumerate() {
        let end = marks
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(text.len());
        let segment = text[mark.end()..end].trim();
        if segment.is_empty() || segment.contains(':') {
            continue;
        }
        names.push(segment.to_string());
    }
    names
}
