//! Statement-mode engines. Each takes the reconstructed pages and produces
//! the portfolio entries for its statement family.

pub mod depository;
pub mod detailed;
pub mod summary;
pub mod transaction;

use crate::layout::{ColumnMap, Line};

/// One page after line reconstruction: ordered lines plus the column header
/// map located on that page (empty on pages without a transaction table).
#[derive(Debug, Clone)]
pub struct PageContent {
    pub lines: Vec<Line>,
    pub columns: ColumnMap,
}

pub use depository::parse_depository;
pub use detailed::parse_detailed;
pub use summary::parse_summary;
pub use transaction::parse_transaction_line;
