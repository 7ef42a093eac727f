//! Query engine error types.

use crate::store::StoreError;

/// Errors returned by observation queries.
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    /// No fact-group matched the query.
    #[error("{message}")]
    NotFound { message: String },

    /// The fact store could not run the query.
    #[error("Fact store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// The query exceeded its time budget.
    #[error("Query timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u64 },
}

impl QueryError {
    /// Create a not-found error with a client-facing message.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Whether this is an expected "no data" outcome.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
