//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by key-value and task storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O failed for {}: {source}", path.display())]
    Io {
        /// File that was accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The stored data could not be encoded or decoded.
    #[error("malformed storage data in {}: {source}", path.display())]
    Malformed {
        /// File that was accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Returns true if the data exists but could not be decoded.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}
