//! Key-value side-store backends
//!
//! Values are opaque strings (JSON in practice). The file backend keeps
//! one file per key and never leaves a half-written file behind: every
//! write goes to a temporary file in the same directory and is renamed
//! over the target.

use crate::error::{StoreError, StoreResult};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Durable string storage addressed by key
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Directory-backed store, one `<key>.<extension>` file per key
///
/// The extension defaults to `json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    extension: String,
}

impl FileStore {
    /// Creates a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: "json".to_string(),
        }
    }

    /// Uses a different file extension for stored values
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Returns the root directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing `key`
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');

        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{}.{}", key, self.extension)))
    }

    fn ensure_directory_exists(&self) -> StoreResult<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| StoreError::Write {
                path: self.dir.clone(),
                source: e,
            })?;
            log::info!("Created storage directory: {}", self.dir.display());
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StoreError::Read { path, source: e })
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        self.ensure_directory_exists()?;

        let mut temp_file = NamedTempFile::new_in(&self.dir)?;
        temp_file.write_all(value.as_bytes())?;
        temp_file.flush()?;

        temp_file.persist(&path).map_err(|e| StoreError::Write {
            path: path.clone(),
            source: e.error,
        })?;

        log::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path).map_err(|e| StoreError::Write { path, source: e })?;
        }
        Ok(())
    }
}

/// In-process store for tests and demos
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| StoreError::Custom("Lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Custom("Lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Custom("Lock poisoned".to_string()))?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, FileStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(temp_dir.path().join("data"));
        (temp_dir, store)
    }

    #[test]
    fn test_missing_key_returns_none() {
        let (_temp_dir, store) = setup_test_dir();
        assert_eq!(store.get("quotes").unwrap(), None);
    }

    #[test]
    fn test_put_creates_directory_and_roundtrips() {
        let (_temp_dir, store) = setup_test_dir();

        store.put("quotes", "[]").expect("Should write");
        assert!(store.dir().exists());
        assert_eq!(store.get("quotes").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_put_overwrites() {
        let (_temp_dir, store) = setup_test_dir();

        store.put("k", "one").unwrap();
        store.put("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_remove() {
        let (_temp_dir, store) = setup_test_dir();

        store.put("k", "v").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        // Removing twice is fine
        store.remove("k").unwrap();
    }

    #[test]
    fn test_custom_extension() {
        let (_temp_dir, store) = setup_test_dir();
        let store = store.with_extension("toml");

        store.put("config", "a = 1").unwrap();
        assert!(store.dir().join("config.toml").exists());
        assert_eq!(store.get("config").unwrap().as_deref(), Some("a = 1"));
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let (_temp_dir, store) = setup_test_dir();

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(
                store.put(key, "v"),
                Err(StoreError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
