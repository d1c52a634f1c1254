//! Error types for analyze operations.

use std::fmt;

use thiserror::Error;

use crate::models::{ErrorEntry, RawResponse};

/// Errors surfaced while polling an analyze operation.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The status check itself failed at the transport level. Not cached;
    /// a later refresh may succeed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered the status check with a non-success HTTP status.
    #[error("service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    /// The status response body could not be decoded.
    #[error("failed to parse status response: {0}")]
    Parse(String),

    /// The operation is still running; not a failure.
    #[error("operation {0} has not completed yet")]
    NotReady(String),

    /// The remote job reached a terminal failed status. Cached on the
    /// operation and raised on every subsequent result read.
    #[error("{0}")]
    OperationFailed(OperationFailure),

    #[error("invalid operation location: {0}")]
    InvalidLocation(String),

    #[error("invalid service endpoint: {0}")]
    InvalidEndpoint(String),

    /// Waiting was cancelled before the operation completed. The remote job
    /// keeps running; this client simply stopped observing it.
    #[error("wait for completion was cancelled")]
    Cancelled,
}

/// Structured terminal failure built from the server-reported error list.
///
/// Built exactly once per failed operation and cloned for every raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    /// HTTP status of the check that reported the failure.
    pub status: u16,
    pub errors: Vec<ErrorEntry>,
}

impl OperationFailure {
    /// Build the failure from the raw response and server error list.
    pub fn from_response(response: &RawResponse, errors: &[ErrorEntry]) -> Self {
        Self {
            status: response.status,
            errors: errors.to_vec(),
        }
    }
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "analyze operation failed (HTTP {})", self.status)?;
        for entry in &self.errors {
            write!(f, "; {}: {}", entry.code, entry.message)?;
        }
        Ok(())
    }
}
