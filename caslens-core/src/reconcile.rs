//! Running-balance reconciliation for parsed schemes.
//!
//! Statements sometimes print same-day rows out of chronological order, and
//! column artifacts can leave the printed running balance inconsistent with
//! the row order. When that happens we stable-sort by date and replay the
//! ledger from the opening balance. `units`, `amount` and `type` are never
//! touched.

use rust_decimal::Decimal;

use crate::types::Scheme;

/// Sort a scheme's transactions chronologically and recompute each running
/// balance from the opening balance forward. A no-op when the source order
/// is already date-sorted.
pub fn reconcile_scheme(scheme: &mut Scheme) {
    let sorted = scheme
        .transactions
        .windows(2)
        .all(|pair| pair[0].date <= pair[1].date);
    if sorted {
        return;
    }

    scheme.transactions.sort_by_key(|t| t.date);
    let mut balance = scheme.open;
    for txn in &mut scheme.transactions {
        balance += txn.units.unwrap_or(Decimal::ZERO);
        txn.balance = Some(balance);
    }
}
