//! Error types for the reconciliation service
//!
//! One stable kind per failure class, surfaced unchanged to callers:
//! validation errors are raised before any remote or persistence side
//! effect, and remote failures abort the operation before any local
//! write.

use thiserror::Error;

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reconciliation errors
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing required field (caller error, not retried)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown transaction, contract, or participant id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Idempotent duplicate approval
    #[error("Already approved: {0}")]
    AlreadyApproved(String),

    /// State invariant violated (e.g. approving a rejected transfer)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Ledger transport or remote failure (safe for the caller to retry)
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),

    /// Cache store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<approval_core::Error> for Error {
    fn from(err: approval_core::Error) -> Self {
        match err {
            approval_core::Error::InvalidArgument(m) => Error::InvalidArgument(m),
            approval_core::Error::NotFound(m) => Error::NotFound(m),
            approval_core::Error::AlreadyApproved(m) => Error::AlreadyApproved(m),
            approval_core::Error::Conflict(m) => Error::Conflict(m),
            approval_core::Error::Config(m) => Error::Config(m),
            approval_core::Error::Other(m) => Error::Store(m),
        }
    }
}

impl From<ledger_gateway::Error> for Error {
    fn from(err: ledger_gateway::Error) -> Self {
        match err {
            ledger_gateway::Error::Unavailable(m) => Error::LedgerUnavailable(m),
            ledger_gateway::Error::Config(m) => Error::Config(m),
        }
    }
}
