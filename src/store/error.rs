//! Fact store error types.

use std::path::PathBuf;

/// Errors that can occur during fact store operations.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Failed to open or create database.
    #[error("Failed to open fact store at {path}: {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to execute SQL.
    #[error("Fact store query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// A read ran past its deadline and was aborted.
    #[error("Query aborted after exceeding its {budget_ms} ms budget")]
    Interrupted { budget_ms: u64 },

    /// Blocking task was cancelled.
    #[error("Blocking task cancelled")]
    TaskCancelled,

    /// Failed to create parent directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
