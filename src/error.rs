//! Error types for the Atheneum client

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate
pub type ClientResult<T> = Result<T, ClientError>;

/// Record of a two-step operation that applied its first mutation but could
/// neither apply the second nor undo the first. The server now holds state
/// that needs manual reconciliation.
#[derive(Debug, Clone)]
pub struct PartialFailure {
    /// Operation that was interrupted (`create_reservation` or
    /// `cancel_reservation`).
    pub operation: &'static str,
    /// Book whose availability flag no longer matches its loans.
    pub book_id: i32,
    /// Loan left behind by the creation path. `None` on the cancellation
    /// path, where the loan was already deleted and could not be restored.
    pub orphaned_loan_id: Option<i32>,
    /// Error from the book update that followed the loan mutation.
    pub step_error: String,
    /// Error from the compensating loan mutation.
    pub compensation_error: String,
}

impl fmt::Display for PartialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} left book {} inconsistent: book update failed ({}) and compensation failed ({})",
            self.operation, self.book_id, self.step_error, self.compensation_error
        )?;
        if let Some(loan_id) = self.orphaned_loan_id {
            write!(f, "; orphaned loan {}", loan_id)?;
        }
        Ok(())
    }
}

/// Main client error type
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] reqwest::Error),

    #[error("Server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to decode server response: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The dangerous case: the first of two dependent mutations is applied,
    /// the second is not, and the compensating action failed too.
    #[error("Partial application: {0}")]
    Partial(PartialFailure),

    #[error("Resolution error: {0}")]
    Resolution(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("No active session; log in first")]
    NoSession,
}

impl ClientError {
    /// True when the server answered 404 for the addressed resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Rejected { status: 404, .. })
    }
}
