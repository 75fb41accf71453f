//! Error types for sync operations

use quotesync_core::CoreError;
use quotesync_store::StoreError;
use thiserror::Error;

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during synchronization
#[derive(Debug, Error)]
pub enum SyncError {
    /// Remote fetch or push failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Local storage failed
    #[error("Storage error: {0}")]
    Storage(StoreError),

    /// Rejected input
    #[error(transparent)]
    Validation(CoreError),

    /// A cycle or resolution is already running, or conflicts block new cycles
    #[error("Sync already in progress")]
    AlreadyInProgress,

    /// Resolution requested with nothing pending
    #[error("No pending conflicts to resolve")]
    NoPendingConflicts,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

impl SyncError {
    /// Returns true for remote failures
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => Self::Validation(v),
            other => Self::Storage(other),
        }
    }
}

impl From<CoreError> for SyncError {
    fn from(e: CoreError) -> Self {
        Self::Validation(e)
    }
}
