//! caslens-ingest: turns word-level PDF text extraction into a structured
//! Consolidated Account Statement.
//!
//! The pipeline is: classify the issuer and statement mode from the first
//! page, reconstruct reading-order lines from word boxes on every page,
//! locate the transaction-table columns, then hand the pages to the engine
//! for the detected mode. Balance reconciliation runs last.

pub mod detect;
pub mod layout;
pub mod numbers;
pub mod parsers;
pub mod patterns;

pub use layout::{Column, ColumnMap, Document, Line, Page, Rect, Tolerances, Word};
pub use parsers::PageContent;

use caslens_core::{
    reconcile_scheme, ParsedStatement, Result, StatementBody, StatementMetadata, StatementMode,
};

/// Knobs for a single parse. `Default` matches the common case.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Sort transactions by date and replay balances when a scheme's
    /// transactions arrive out of order (multi-statement merges).
    pub sort_transactions: bool,
    pub tolerances: Tolerances,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            sort_transactions: true,
            tolerances: Tolerances::default(),
        }
    }
}

/// Parse a document with default options.
pub fn parse_document(document: &Document) -> Result<ParsedStatement> {
    parse_document_with(document, &ParseOptions::default())
}

/// Parse a document: classify, reconstruct, run the mode's engine.
pub fn parse_document_with(
    document: &Document,
    options: &ParseOptions,
) -> Result<ParsedStatement> {
    let issuer = detect::detect_issuer(&document.first_page_blocks)?;
    let mode = detect::detect_mode(issuer, &document.first_page_blocks)?;
    log::debug!("classified statement: issuer={issuer:?} mode={mode:?}");

    let pages: Vec<PageContent> = document
        .pages
        .iter()
        .map(|page| PageContent {
            lines: layout::recover_lines(&page.words, &options.tolerances),
            columns: layout::column_positions(&page.words),
        })
        .collect();

    let full_text: String = pages
        .iter()
        .flat_map(|page| page.lines.iter().map(|line| line.text.as_str()))
        .collect::<Vec<_>>()
        .join("\n");
    let period = detect::statement_period(&full_text, mode)?;

    let metadata = StatementMetadata {
        issuer,
        mode,
        period,
        investor_info: document.investor_info.clone(),
    };

    let body = match mode {
        StatementMode::Detailed => {
            let mut schemes = parsers::parse_detailed(&pages, &period, &options.tolerances)?;
            if options.sort_transactions {
                for scheme in &mut schemes {
                    reconcile_scheme(scheme);
                }
            }
            StatementBody::Schemes(schemes)
        }
        StatementMode::Summary => StatementBody::Schemes(parsers::parse_summary(&pages, &period)?),
        StatementMode::Depository => {
            StatementBody::Accounts(parsers::parse_depository(&pages)?)
        }
    };

    Ok(ParsedStatement { metadata, body })
}
