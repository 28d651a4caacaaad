use thiserror::Error;

/// Fatal parse failures. Everything else degrades into best-effort output:
/// unrecognized lines are skipped, unclassifiable transactions are kept with
/// type `UNKNOWN`.
#[derive(Error, Debug)]
pub enum CasError {
    #[error("layout error: scheme entry found before any folio line")]
    SchemeBeforeFolio,

    #[error("unable to determine statement type: {0}")]
    UnknownStatementType(String),

    #[error("statement period not found in document header")]
    MissingStatementPeriod,

    #[error("invalid number '{0}'")]
    BadNumber(String),

    #[error("invalid date '{0}'")]
    BadDate(String),
}

pub type Result<T> = std::result::Result<T, CasError>;
