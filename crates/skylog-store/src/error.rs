//! Storage error types.

use thiserror::Error;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error (open, query, commit).
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// History export failed. Stored data is unaffected.
    #[error("Export error: {0}")]
    Export(String),

    /// Filesystem error (directory creation, file write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for StoreError {
    fn from(error: csv::Error) -> Self {
        Self::Export(error.to_string())
    }
}
