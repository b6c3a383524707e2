//! Error taxonomy for approval operations

use thiserror::Error;

/// Result type for approval-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Approval errors
///
/// Each variant is a stable error kind surfaced to callers:
/// `InvalidArgument` is a caller error and never retried,
/// `AlreadyApproved` is an idempotent duplicate reported distinctly
/// from a fresh approval, `Conflict` is a state invariant violation.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing required field (caller error)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown id (transaction, contract, participant)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate approval from the same participant
    #[error("Already approved: {0}")]
    AlreadyApproved(String),

    /// State invariant violated (e.g. approving a rejected transfer)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
