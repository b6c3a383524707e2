//! Error types for the ledger gateway

use thiserror::Error;

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Gateway errors
///
/// Every non-success response or transport failure collapses into
/// `Unavailable`: the core never distinguishes ledger-internal reasons
/// beyond success/failure, and `Unavailable` is always safe to retry
/// because approvals are deduplicated by participant identity.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure, timeout, non-success status, or bad body
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    /// Configuration error (bad base URL, client build failure)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Unavailable(err.to_string())
    }
}
