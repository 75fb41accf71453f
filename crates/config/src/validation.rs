//! Field checks shared by the config sections

pub use crate::error::ValidationError;

/// A config section that can check its own values
pub trait ConfigSection: Default {
    /// Returns every problem found, not just the first
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Table name in the config file
    fn section_name(&self) -> &'static str;
}

/// Common field checks
pub struct Validator;

impl Validator {
    /// Checks `min <= value <= max`
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            Err(ValidationError::new(
                field,
                format!("must be between {} and {} (got {})", min, max, value),
            ))
        } else {
            Ok(())
        }
    }

    /// Checks that a storage key maps to a plain file name
    ///
    /// Mirrors the key rules of [`quotesync_store::FileStore`] so a bad key
    /// is caught when settings are saved rather than on the first write.
    pub fn storage_key(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "must not be empty"));
        }

        let valid = !value.starts_with('.')
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');

        if valid {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                format!("may only contain letters, digits, '_', '-' and '.' (got {:?})", value),
            ))
        }
    }

    /// Gathers the failures out of a batch of checks
    pub fn collect_errors(
        results: Vec<Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(|r| r.err()).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range() {
        assert!(Validator::in_range(30, 1, 86_400, "test").is_ok());
        let err = Validator::in_range(0, 1, 86_400, "sync.interval_secs").unwrap_err();
        assert_eq!(err.message, "must be between 1 and 86400 (got 0)");
    }

    #[test]
    fn test_storage_key() {
        assert!(Validator::storage_key("remote_quotes", "test").is_ok());
        assert!(Validator::storage_key("a/b", "test").is_err());
        assert!(Validator::storage_key(".hidden", "test").is_err());
        assert!(Validator::storage_key("  ", "test").is_err());
    }

    #[test]
    fn test_collect_errors_keeps_only_failures() {
        let results = vec![
            Ok(()),
            Err(ValidationError::new("field1", "error1")),
            Err(ValidationError::new("field2", "error2")),
        ];
        let errors = Validator::collect_errors(results).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].field, "field2");
    }
}
