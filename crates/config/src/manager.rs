//! Entry point for locating, loading and saving settings

use crate::persistence::ConfigStore;
use crate::{Config, ConfigError, ConfigResult};
use directories::ProjectDirs;
use quotesync_store::FileStore;
use std::path::{Path, PathBuf};

/// Owns one config directory and the `config.toml` inside it
pub struct ConfigManager {
    store: ConfigStore,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses the platform config directory
    ///
    /// - Linux: `~/.config/quotesync/`
    /// - macOS: `~/Library/Application Support/quotesync/`
    /// - Windows: `%APPDATA%\quotesync\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = ProjectDirs::from("", "", "quotesync")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDirectory)?;
        Self::with_directory(config_dir)
    }

    /// Uses `config_dir`, which is created on the first save
    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        Ok(Self {
            store: ConfigStore::new(&config_dir)?,
            config_dir,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Full path of `config.toml`
    pub fn config_path(&self) -> &Path {
        self.store.path()
    }

    /// Resolves `storage.data_dir` against the config directory
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        if config.storage.data_dir.is_absolute() {
            config.storage.data_dir.clone()
        } else {
            self.config_dir.join(&config.storage.data_dir)
        }
    }

    /// File backend rooted at the configured data directory
    pub fn open_storage(&self, config: &Config) -> FileStore {
        FileStore::new(self.data_dir(config))
    }

    /// Reads `config.toml`; a missing file gives the defaults
    pub fn load(&self) -> ConfigResult<Config> {
        self.store.load()
    }

    /// Like [`ConfigManager::load`] but never fails
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            log::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    }

    /// Validates and writes `config`
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.store.save(config)
    }

    /// Writes the defaults unless a config file already exists
    ///
    /// Returns true if a file was written.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::debug!("Keeping existing config at {}", self.config_path().display());
            return Ok(false);
        }

        self.save(&Config::default())?;
        Ok(true)
    }

    /// Loads the config and applies environment variable overrides
    ///
    /// Recognized variables:
    /// - `QUOTESYNC_SYNC_INTERVAL_SECS`
    /// - `QUOTESYNC_SYNC_GATEWAY_TIMEOUT_MS`
    /// - `QUOTESYNC_STORAGE_DATA_DIR`
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());

        if let Err(errors) = config.validate() {
            log::warn!("After env overrides: {}", ConfigError::Invalid(errors));
        }

        Ok(config)
    }
}

fn apply_env_overrides<F>(config: &mut Config, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(interval) = var("QUOTESYNC_SYNC_INTERVAL_SECS") {
        match interval.parse::<u64>() {
            Ok(v) => config.sync.interval_secs = v,
            Err(_) => log::warn!("Ignoring invalid QUOTESYNC_SYNC_INTERVAL_SECS={}", interval),
        }
    }

    if let Some(timeout) = var("QUOTESYNC_SYNC_GATEWAY_TIMEOUT_MS") {
        match timeout.parse::<u64>() {
            Ok(v) => config.sync.gateway_timeout_ms = v,
            Err(_) => log::warn!(
                "Ignoring invalid QUOTESYNC_SYNC_GATEWAY_TIMEOUT_MS={}",
                timeout
            ),
        }
    }

    if let Some(dir) = var("QUOTESYNC_STORAGE_DATA_DIR") {
        config.storage.data_dir = PathBuf::from(dir);
    }
}
