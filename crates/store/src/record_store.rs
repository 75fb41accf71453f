//! The Record Store: canonical local quote collection
//!
//! The collection lives in memory and is mirrored to the side-store as a
//! JSON array under the records key. Loading never fails: a missing copy
//! is seeded with the default quotes, a corrupt copy is replaced by them,
//! and unreadable storage yields an empty collection.

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;
use quotesync_core::{
    categories, default_quotes, filter_by_category, normalize_category, IdGenerator, QuoteRecord,
    RecordId,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Storage keys used by the Record Store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
    /// Key holding the JSON-encoded local collection
    pub records: String,
    /// Key holding the last selected category filter
    pub filter: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            records: "quotes".to_string(),
            filter: "selected_category".to_string(),
        }
    }
}

/// Owns the local quote collection
pub struct RecordStore {
    backend: Arc<dyn KeyValueStore>,
    ids: Arc<dyn IdGenerator>,
    keys: StoreKeys,
    records: Vec<QuoteRecord>,
    pending_changes: bool,
}

impl RecordStore {
    /// Creates an empty store over `backend`; call [`RecordStore::load`] to populate it
    pub fn new(backend: Arc<dyn KeyValueStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            backend,
            ids,
            keys: StoreKeys::default(),
            records: Vec::new(),
            pending_changes: false,
        }
    }

    /// Uses custom storage keys
    pub fn with_keys(mut self, keys: StoreKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Restores the local collection from durable storage
    pub fn load(&mut self) -> &[QuoteRecord] {
        self.pending_changes = false;

        match self.backend.get(&self.keys.records) {
            Ok(None) => {
                log::info!("No stored quotes under '{}', seeding defaults", self.keys.records);
                self.seed_defaults();
            }
            Ok(Some(raw)) => match serde_json::from_str::<Vec<QuoteRecord>>(&raw) {
                Ok(records) => {
                    self.records = dedupe(drop_invalid(records));
                    log::debug!("Loaded {} quotes", self.records.len());
                }
                Err(e) => {
                    log::warn!("Stored quotes are corrupt ({}), restoring defaults", e);
                    self.seed_defaults();
                }
            },
            Err(e) => {
                log::warn!("Failed to read stored quotes: {}, starting empty", e);
                self.records = Vec::new();
            }
        }

        &self.records
    }

    fn seed_defaults(&mut self) {
        if let Err(e) = self.save(default_quotes()) {
            log::warn!("Failed to persist default quotes: {}", e);
            self.records = default_quotes();
        }
    }

    /// Overwrites the durable copy and adopts `collection` as the local set
    ///
    /// Marks the collection as diverged from the last synced state. Only
    /// the first record of each id is kept.
    pub fn save(&mut self, collection: Vec<QuoteRecord>) -> StoreResult<()> {
        let collection = dedupe(collection);
        let json = serde_json::to_string(&collection)?;
        self.backend.put(&self.keys.records, &json)?;

        self.records = collection;
        self.pending_changes = true;
        Ok(())
    }

    /// Validates and appends a new version-1 quote, then saves
    ///
    /// On a validation error the collection is left untouched.
    pub fn add(
        &mut self,
        text: &str,
        category: &str,
        author: Option<&str>,
    ) -> StoreResult<QuoteRecord> {
        let mut record = QuoteRecord::new(RecordId::from_string(""), text, category, author)?;
        record.id = self.fresh_id()?;

        let mut next = self.records.clone();
        next.push(record.clone());
        self.save(next)?;

        log::info!("Added quote {} in '{}'", record.id, record.category);
        Ok(record)
    }

    /// Next generated id not already in the collection
    fn fresh_id(&self) -> StoreResult<RecordId> {
        for _ in 0..=self.records.len() {
            let id = self.ids.next_id();
            if self.get(&id).is_none() {
                return Ok(id);
            }
            log::debug!("Generated id {} is taken, drawing another", id);
        }

        Err(StoreError::Custom(
            "Id generator keeps returning ids already in use".to_string(),
        ))
    }

    /// Swaps in an entirely new collection (merge or resolution result)
    pub fn replace(&mut self, collection: Vec<QuoteRecord>) -> StoreResult<()> {
        log::debug!(
            "Replacing local collection ({} -> {} quotes)",
            self.records.len(),
            collection.len()
        );
        self.save(collection)
    }

    /// Current local collection
    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    /// Looks up a record by id
    pub fn get(&self, id: &RecordId) -> Option<&QuoteRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Number of local records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no local records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if the collection changed since it was last published
    pub fn has_pending_changes(&self) -> bool {
        self.pending_changes
    }

    /// Clears the pending-changes flag after a successful push
    pub fn mark_synced(&mut self) {
        self.pending_changes = false;
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<String> {
        categories(&self.records)
    }

    /// Records matching `category`, or all of them
    pub fn filtered(&self, category: Option<&str>) -> Vec<&QuoteRecord> {
        filter_by_category(&self.records, category)
    }

    /// Last selected category filter, if any
    pub fn selected_filter(&self) -> Option<String> {
        match self.backend.get(&self.keys.filter) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                log::warn!("Failed to read selected filter: {}", e);
                None
            }
        }
    }

    /// Persists the selected category filter; `None`, blank or `"all"` clears it
    pub fn set_selected_filter(&mut self, category: Option<&str>) -> StoreResult<Option<String>> {
        let normalized = category
            .map(normalize_category)
            .filter(|c| !c.is_empty() && c != "all");

        match &normalized {
            Some(c) => self.backend.put(&self.keys.filter, c)?,
            None => self.backend.remove(&self.keys.filter)?,
        }

        Ok(normalized)
    }
}

fn drop_invalid(records: Vec<QuoteRecord>) -> Vec<QuoteRecord> {
    records
        .into_iter()
        .filter(|r| match r.validate() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Dropping stored quote '{}': {}", r.id, e);
                false
            }
        })
        .collect()
}

fn dedupe(records: Vec<QuoteRecord>) -> Vec<QuoteRecord> {
    let mut seen = HashSet::new();
    let total = records.len();
    let unique: Vec<QuoteRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect();

    if unique.len() != total {
        log::warn!(
            "Dropped {} stored quotes with duplicate ids",
            total - unique.len()
        );
    }
    unique
}
