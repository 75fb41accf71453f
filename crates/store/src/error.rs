//! Error types for storage operations

use quotesync_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing local storage
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read a stored value
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a stored value
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Key contains characters that cannot be mapped to a file name
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rejected input
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

impl StoreError {
    /// Returns true if this error is a rejected input rather than a storage failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_display() {
        let err = StoreError::InvalidKey("../etc".to_string());
        assert!(err.to_string().contains("Invalid storage key"));
    }

    #[test]
    fn test_validation_passthrough() {
        let err: StoreError = CoreError::validation("text", "must not be empty").into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("text must not be empty"));
    }
}
