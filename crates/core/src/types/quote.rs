//! Quote record domain model

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author used when none is supplied
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// Unique identifier for a quote record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new random RecordId
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a RecordId from an existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the RecordId as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Trims and lowercases a category name
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

fn initial_version() -> u64 {
    1
}

/// One versioned quote entry
///
/// `version` belongs to whichever side last wrote the record and only
/// ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: RecordId,
    pub text: String,
    pub category: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "initial_version")]
    pub version: u64,
}

impl QuoteRecord {
    /// Builds a validated version-1 record
    ///
    /// Text and category must be non-empty after trimming. The category is
    /// normalized and a blank author becomes [`DEFAULT_AUTHOR`].
    pub fn new(id: RecordId, text: &str, category: &str, author: Option<&str>) -> CoreResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::validation("text", "must not be empty"));
        }

        let category = normalize_category(category);
        if category.is_empty() {
            return Err(CoreError::validation("category", "must not be empty"));
        }

        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .unwrap_or_else(default_author);

        Ok(Self {
            id,
            text: text.to_string(),
            category,
            author,
            version: 1,
        })
    }

    /// Checks a record that arrived without going through [`QuoteRecord::new`]
    ///
    /// Id, text and category must be non-blank and the version at least 1.
    pub fn validate(&self) -> CoreResult<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(CoreError::validation("id", "must not be empty"));
        }
        if self.text.trim().is_empty() {
            return Err(CoreError::validation("text", "must not be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(CoreError::validation("category", "must not be empty"));
        }
        if self.version == 0 {
            return Err(CoreError::validation("version", "must be at least 1"));
        }
        Ok(())
    }

    /// Returns the same record with a different version
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Returns true if this record belongs to the given category
    pub fn in_category(&self, category: &str) -> bool {
        self.category == normalize_category(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_creation() {
        let id1 = RecordId::new();
        let id2 = RecordId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_record_id_from_string() {
        let id = RecordId::from_string("quote-1");
        assert_eq!(id.as_str(), "quote-1");
        assert_eq!(id.to_string(), "quote-1");
    }

    #[test]
    fn test_new_record_normalizes_fields() {
        let record = QuoteRecord::new(
            RecordId::from("1"),
            "  Stay hungry.  ",
            "  Inspiration ",
            Some("  "),
        )
        .unwrap();

        assert_eq!(record.text, "Stay hungry.");
        assert_eq!(record.category, "inspiration");
        assert_eq!(record.author, DEFAULT_AUTHOR);
        assert_eq!(record.version, 1);
    }

    #[test]
    fn test_empty_text_rejected() {
        let err = QuoteRecord::new(RecordId::new(), "   ", "wisdom", None).unwrap_err();
        assert_eq!(err.field(), "text");
    }

    #[test]
    fn test_empty_category_rejected() {
        let err = QuoteRecord::new(RecordId::new(), "Know thyself", " \t", None).unwrap_err();
        assert_eq!(err.field(), "category");
    }

    #[test]
    fn test_in_category_is_case_insensitive() {
        let record = QuoteRecord::new(RecordId::new(), "text", "Wisdom", None).unwrap();
        assert!(record.in_category("WISDOM"));
        assert!(!record.in_category("motivation"));
    }

    #[test]
    fn test_json_shape() {
        let record = QuoteRecord::new(RecordId::from("7"), "a", "b", Some("c"))
            .unwrap()
            .with_version(3);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"id": "7", "text": "a", "category": "b", "author": "c", "version": 3})
        );
    }

    #[test]
    fn test_missing_author_and_version_use_defaults() {
        let record: QuoteRecord =
            serde_json::from_str(r#"{"id":"9","text":"t","category":"c"}"#).unwrap();
        assert_eq!(record.author, DEFAULT_AUTHOR);
        assert_eq!(record.version, 1);
    }

    #[test]
    fn test_validate_catches_bad_deserialized_records() {
        let zero: QuoteRecord =
            serde_json::from_str(r#"{"id":"1","text":"t","category":"c","version":0}"#).unwrap();
        assert_eq!(zero.validate().unwrap_err().field(), "version");

        let blank: QuoteRecord =
            serde_json::from_str(r#"{"id":"2","text":"  ","category":"c"}"#).unwrap();
        assert_eq!(blank.validate().unwrap_err().field(), "text");

        let no_category: QuoteRecord =
            serde_json::from_str(r#"{"id":"3","text":"t","category":""}"#).unwrap();
        assert_eq!(no_category.validate().unwrap_err().field(), "category");

        let no_id: QuoteRecord =
            serde_json::from_str(r#"{"id":"","text":"t","category":"c"}"#).unwrap();
        assert_eq!(no_id.validate().unwrap_err().field(), "id");

        let fine = QuoteRecord::new(RecordId::from("4"), "t", "c", None).unwrap();
        assert!(fine.validate().is_ok());
    }
}
