//! Error types for the configuration system

use quotesync_store::StoreError;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or saving settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written
    #[error("Config storage failed: {0}")]
    Storage(#[from] StoreError),

    /// The config file exists but holds nothing
    #[error("Config file is empty")]
    Empty,

    /// The config file is not valid TOML for [`crate::Config`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be encoded as TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Refused to save settings with invalid values
    #[error("Config validation failed: {}", join(.0))]
    Invalid(Vec<ValidationError>),

    /// The platform has no per-user config directory
    #[error("Could not determine the user config directory")]
    NoConfigDirectory,
}

/// One rejected config field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {message}")]
pub struct ValidationError {
    /// Dotted path to the field, e.g. `sync.interval_secs`
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
