//! Local storage configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where and under which keys quotes are kept
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory (relative to the config dir if not absolute)
    pub data_dir: PathBuf,

    /// Key holding the local quote collection
    pub records_key: String,

    /// Key holding the last selected category filter
    pub filter_key: String,

    /// Key holding the simulated remote collection
    pub remote_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            records_key: "quotes".to_string(),
            filter_key: "selected_category".to_string(),
            remote_key: "remote_quotes".to_string(),
        }
    }
}

impl ConfigSection for StorageConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = Vec::new();

        if self.data_dir.as_os_str().is_empty() {
            results.push(Err(ValidationError::new(
                "storage.data_dir",
                "must not be empty",
            )));
        }

        results.push(Validator::storage_key(&self.records_key, "storage.records_key"));
        results.push(Validator::storage_key(&self.filter_key, "storage.filter_key"));
        results.push(Validator::storage_key(&self.remote_key, "storage.remote_key"));

        if self.records_key == self.remote_key {
            results.push(Err(ValidationError::new(
                "storage.remote_key",
                "must differ from storage.records_key",
            )));
        }

        Validator::collect_errors(results)
    }

    fn section_name(&self) -> &'static str {
        "storage"
    }
}
