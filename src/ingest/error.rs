//! Ingestion error types.

use std::path::PathBuf;

use crate::store::StoreError;

/// Errors that can occur while loading a Turtle document.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    /// Failed to open the source file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid Turtle.
    #[error("Invalid Turtle document: {0}")]
    Parse(#[from] rio_turtle::TurtleError),

    /// The triples could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Blocking task was cancelled.
    #[error("Blocking task cancelled")]
    TaskCancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_display() {
        let err = IngestError::Read {
            path: PathBuf::from("/data/result-triples.ttl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("/data/result-triples.ttl"));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: IngestError = StoreError::TaskCancelled.into();
        assert_eq!(err.to_string(), "Blocking task cancelled");
    }
}
