//! Record tree produced by a statement parse.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Statement source, decided once per document from first-page boilerplate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Issuer {
    Cams,
    Kfintech,
    Nsdl,
    Cdsl,
}

impl Issuer {
    /// Depository statements (NSDL/CDSL) carry holdings, not transactions.
    pub fn is_depository(self) -> bool {
        matches!(self, Issuer::Nsdl | Issuer::Cdsl)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementMode {
    Detailed,
    Summary,
    Depository,
}

/// Period the statement covers. Summary statements are point-in-time, so
/// `from` and `to` both hold the "as on" date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Investor identity block, extracted upstream (table layer, out of scope
/// here) and passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorInfo {
    pub name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementMetadata {
    pub issuer: Issuer,
    pub mode: StatementMode,
    pub period: StatementPeriod,
    pub investor_info: Option<InvestorInfo>,
}

/// Economic type of a mutual-fund transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Purchase,
    PurchaseSip,
    Redemption,
    DividendPayout,
    DividendReinvest,
    SwitchIn,
    SwitchInMerger,
    SwitchOut,
    SwitchOutMerger,
    SttTax,
    StampDutyTax,
    TdsTax,
    Segregation,
    Reversal,
    Misc,
    Unknown,
}

/// Direction of a cash flow relative to the holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashFlow {
    Add,
    Subtract,
}

impl TransactionType {
    /// Cash-flow direction used to sign amounts on rows that carry no units
    /// (tax and fee entries). Signs are relative to the holding.
    pub fn cash_flow(self) -> CashFlow {
        match self {
            TransactionType::Redemption
            | TransactionType::SwitchOut
            | TransactionType::SwitchOutMerger
            | TransactionType::DividendPayout => CashFlow::Subtract,
            _ => CashFlow::Add,
        }
    }
}

/// A single dated ledger entry. `units` carries the authoritative sign
/// (positive inflow, negative outflow); `amount` is normalized to match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    #[serde(rename = "type")]
    pub txn_type: TransactionType,
    pub amount: Option<Decimal>,
    pub units: Option<Decimal>,
    pub nav: Option<Decimal>,
    pub balance: Option<Decimal>,
    pub dividend_rate: Option<Decimal>,
}

impl Transaction {
    /// Build a transaction, normalizing the amount sign: it takes the sign of
    /// `units` when units are present, otherwise the direction from the
    /// type's cash-flow table.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        description: String,
        txn_type: TransactionType,
        amount: Option<Decimal>,
        units: Option<Decimal>,
        nav: Option<Decimal>,
        balance: Option<Decimal>,
        dividend_rate: Option<Decimal>,
    ) -> Self {
        let amount = amount.map(|a| {
            let a = a.abs();
            match units {
                Some(u) if u < Decimal::ZERO => -a,
                Some(_) => a,
                None => match txn_type.cash_flow() {
                    CashFlow::Add => a,
                    CashFlow::Subtract => -a,
                },
            }
        });
        Transaction {
            date,
            description,
            txn_type,
            amount,
            units,
            nav,
            balance,
            dividend_rate,
        }
    }
}

/// Valuation snapshot of a scheme at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeValuation {
    pub date: NaiveDate,
    pub nav: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub value: Option<Decimal>,
}

/// A mutual-fund holding within a folio. The folio itself is not a standalone
/// entity: its number and PAN are carried on each scheme, and several schemes
/// may share them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub scheme_name: String,
    pub folio: Option<String>,
    pub pan: Option<String>,
    pub amc: Option<String>,
    pub advisor: Option<String>,
    pub rta: Option<String>,
    pub rta_code: Option<String>,
    pub isin: Option<String>,
    /// Opening unit balance as reported by the statement.
    pub open: Decimal,
    /// Closing unit balance as reported by the statement.
    pub close: Decimal,
    /// Closing balance recomputed as `open + Σ transaction.units`.
    pub close_calculated: Decimal,
    pub valuation: SchemeValuation,
    pub nominees: Vec<String>,
    pub transactions: Vec<Transaction>,
}

/// Holder of a demat account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DematOwner {
    pub name: String,
    pub pan: String,
}

/// Point-in-time equity holding in a depository account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equity {
    pub isin: String,
    pub name: String,
    pub num_shares: Option<Decimal>,
    pub price: Option<Decimal>,
    pub value: Option<Decimal>,
}

/// Point-in-time mutual-fund holding in a depository account or MF folio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutualFundHolding {
    pub isin: String,
    pub name: String,
    pub balance: Option<Decimal>,
    pub nav: Option<Decimal>,
    pub value: Option<Decimal>,
}

/// A depository (NSDL/CDSL) account, or the synthetic "Mutual Fund Folios"
/// aggregate which has no DP/Client id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DematAccount {
    pub name: String,
    pub account_type: String,
    pub dp_id: Option<String>,
    pub client_id: Option<String>,
    pub folios: u32,
    pub balance: Option<Decimal>,
    pub owners: Vec<DematOwner>,
    pub equities: Vec<Equity>,
    pub mutual_funds: Vec<MutualFundHolding>,
}

/// Statement body, depending on the detected mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum StatementBody {
    Schemes(Vec<Scheme>),
    Accounts(Vec<DematAccount>),
}

/// Final output of a parse: immutable metadata plus the record tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedStatement {
    pub metadata: StatementMetadata,
    pub body: StatementBody,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_amount_takes_sign_of_units() {
        let t = Transaction::new(
            date(2024, 4, 2),
            "Redemption".into(),
            TransactionType::Redemption,
            Some(d("5000.00")),
            Some(d("-25.500")),
            None,
            None,
            None,
        );
        assert_eq!(t.amount, Some(d("-5000.00")));

        let t = Transaction::new(
            date(2024, 4, 2),
            "Purchase".into(),
            TransactionType::Purchase,
            Some(d("-5000.00")),
            Some(d("25.500")),
            None,
            None,
            None,
        );
        assert_eq!(t.amount, Some(d("5000.00")));
    }

    #[test]
    fn test_unitless_amount_signed_by_cash_flow() {
        let t = Transaction::new(
            date(2024, 4, 2),
            "*** STT Paid ***".into(),
            TransactionType::SttTax,
            Some(d("0.50")),
            None,
            None,
            None,
            None,
        );
        assert_eq!(t.amount, Some(d("0.50")));

        let t = Transaction::new(
            date(2024, 4, 2),
            "IDCW Payout @ Rs. 0.50 per unit".into(),
            TransactionType::DividendPayout,
            Some(d("160.00")),
            None,
            None,
            None,
            Some(d("0.50")),
        );
        assert_eq!(t.amount, Some(d("-160.00")));
    }

    #[test]
    fn test_transaction_type_serializes_screaming_snake() {
        let json = serde_json::to_string(&TransactionType::PurchaseSip).unwrap();
        assert_eq!(json, "\"PURCHASE_SIP\"");
        let json = serde_json::to_string(&TransactionType::DividendReinvest).unwrap();
        assert_eq!(json, "\"DIVIDEND_REINVEST\"");
    }
}
