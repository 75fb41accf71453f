//! Integration tests for the configuration system

use quotesync_config::{
    Config, ConfigError, ConfigManager, ConfigSection, LogLevel, SyncSettings, CONFIG_VERSION,
};
use tempfile::TempDir;

fn setup_test_manager() -> Result<(TempDir, ConfigManager), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let manager = ConfigManager::with_directory(temp_dir.path().to_path_buf())?;
    Ok((temp_dir, manager))
}

#[test]
fn test_full_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;

    assert!(manager.initialize()?);

    let config = manager.load()?;
    assert_eq!(config.version, CONFIG_VERSION);

    let mut modified = config.clone();
    modified.sync.interval_secs = 300;
    modified.sync.auto_sync = false;
    modified.app.log_level = LogLevel::Debug;
    manager.save(&modified)?;

    let reloaded = manager.load()?;
    assert_eq!(reloaded.sync.interval_secs, 300);
    assert!(!reloaded.sync.auto_sync);
    assert_eq!(reloaded.app.log_level, LogLevel::Debug);

    manager.save(&Config::default())?;
    assert_eq!(manager.load()?, Config::default());

    Ok(())
}

#[test]
fn test_partial_file_fills_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    std::fs::write(
        manager.config_path(),
        "[sync]\ninterval_secs = 10\n\n[storage]\nremote_key = \"server\"\n",
    )?;

    let config = manager.load()?;
    assert_eq!(config.sync.interval_secs, 10);
    assert_eq!(config.sync.gateway_timeout_ms, SyncSettings::default().gateway_timeout_ms);
    assert_eq!(config.storage.remote_key, "server");
    assert_eq!(config.storage.records_key, "quotes");

    Ok(())
}

#[test]
fn test_invalid_config_is_not_saved() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp_dir, manager) = setup_test_manager()?;
    manager.save(&Config::default())?;

    let mut invalid = Config::default();
    invalid.storage.records_key = "remote_quotes".to_string();
    match manager.save(&invalid) {
        Err(ConfigError::Invalid(errors)) => assert_eq!(errors[0].field, "storage.remote_key"),
        other => panic!("expected validation failure, got {:?}", other),
    }

    assert_eq!(manager.load()?, Config::default());
    Ok(())
}

#[test]
fn test_section_names() {
    let config = Config::default();
    assert_eq!(config.app.section_name(), "app");
    assert_eq!(config.storage.section_name(), "storage");
    assert_eq!(config.sync.section_name(), "sync");
}
