//! Reading and writing `config.toml`
//!
//! The file lives in the config directory and goes through the same
//! [`FileStore`] that holds quotes, so saves get its atomic
//! write-then-rename.

use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use quotesync_store::{FileStore, KeyValueStore};
use std::path::{Path, PathBuf};

const CONFIG_KEY: &str = "config";

/// The settings file inside one config directory
pub(crate) struct ConfigStore {
    files: FileStore,
    path: PathBuf,
}

impl ConfigStore {
    pub(crate) fn new(config_dir: &Path) -> ConfigResult<Self> {
        let files = FileStore::new(config_dir).with_extension("toml");
        let path = files.path_for(CONFIG_KEY)?;
        Ok(Self { files, path })
    }

    /// Location of `config.toml`
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the settings file
    ///
    /// A missing file yields the defaults. An empty or unparsable file is
    /// an error. Out-of-range values are only logged, so a hand-edited file
    /// still loads and can be fixed.
    pub(crate) fn load(&self) -> ConfigResult<Config> {
        let Some(contents) = self.files.get(CONFIG_KEY)? else {
            log::info!("No config at {}, using defaults", self.path.display());
            return Ok(Config::default());
        };

        if contents.trim().is_empty() {
            return Err(ConfigError::Empty);
        }

        let config: Config = toml::from_str(&contents)?;

        if config.version > CONFIG_VERSION {
            log::warn!(
                "Config version {} is newer than supported version {}, using as-is",
                config.version,
                CONFIG_VERSION
            );
        }

        if let Err(errors) = config.validate() {
            log::warn!("{}", ConfigError::Invalid(errors));
        }

        Ok(config)
    }

    /// Validates and writes the settings file
    pub(crate) fn save(&self, config: &Config) -> ConfigResult<()> {
        config.validate().map_err(ConfigError::Invalid)?;

        let toml = toml::to_string_pretty(config)?;
        self.files.put(CONFIG_KEY, &toml)?;

        log::info!("Config saved to {}", self.path.display());
        Ok(())
    }
}
