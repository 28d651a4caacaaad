//! caslens-core: domain model for Consolidated Account Statement parsing.
//!
//! Holds the issuer-agnostic record tree (folio → scheme → transaction, or
//! demat account → holding), the transaction-type classifier and the balance
//! reconciler. Geometry and regex grammars live in `caslens-ingest`.

pub mod classify;
pub mod error;
pub mod reconcile;
pub mod types;

pub use classify::classify_transaction;
pub use error::{CasError, Result};
pub use reconcile::reconcile_scheme;
pub use types::{
    CashFlow, DematAccount, DematOwner, Equity, InvestorInfo, Issuer, MutualFundHolding,
    ParsedStatement, Scheme, SchemeValuation, StatementBody, StatementMetadata, StatementMode,
    StatementPeriod, Transaction, TransactionType,
};
