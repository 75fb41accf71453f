//! Error types for the quote domain model

use thiserror::Error;

/// Result type for domain operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building or validating quote records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A required field was empty after trimming
    #[error("Validation failed: {field} {message}")]
    Validation { field: String, message: String },
}

impl CoreError {
    /// Creates a validation error for a field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the name of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::Validation { field, .. } => field,
        }
    }

    /// Returns a message suitable for showing next to the input form
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { field, .. } => match field.as_str() {
                "text" => "Please enter the quote text.".to_string(),
                "category" => "Please enter a category.".to_string(),
                other => format!("Please fill in the {} field.", other),
            },
        }
    }
}
