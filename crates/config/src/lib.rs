//! QuoteSync settings
//!
//! Where quotes are stored and how often they are reconciled with the
//! remote store, kept in a `config.toml` in the user's config directory.
//! Every section validates itself; a file with bad values still loads
//! (with a warning) but is never written back.
//!
//! # Example
//!
//! ```rust,no_run
//! use quotesync_config::ConfigManager;
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load_or_default();
//! println!("Sync every {}s", config.sync.interval_secs);
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

pub mod app_config;
mod storage_config;
mod sync_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::ConfigManager;
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use storage_config::StorageConfig;
pub use sync_config::SyncSettings;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Everything in `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// File format version
    pub version: u32,

    pub app: AppConfig,

    /// Local storage layout
    pub storage: StorageConfig,

    /// Sync schedule and remote call limits
    pub sync: SyncSettings,
}

impl Config {
    /// Checks every section and returns all problems found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        collect(&self.app, &mut errors);
        collect(&self.storage, &mut errors);
        collect(&self.sync, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn collect(section: &impl ConfigSection, errors: &mut Vec<ValidationError>) {
    if let Err(mut found) = section.validate() {
        log::debug!("[{}] has {} invalid values", section.section_name(), found.len());
        errors.append(&mut found);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            storage: StorageConfig::default(),
            sync: SyncSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_errors_from_all_sections_collected() {
        let mut config = Config::default();
        config.storage.records_key = String::new();
        config.sync.interval_secs = 0;

        let fields: Vec<String> = config
            .validate()
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["storage.records_key", "sync.interval_secs"]);
    }
}
