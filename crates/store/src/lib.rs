//! Durable local storage for QuoteSync
//!
//! This crate provides:
//! - A small key-value side-store abstraction with file and in-memory backends
//! - The Record Store, which owns the canonical local quote collection
//! - Persistence of the last selected category filter
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use quotesync_core::SequentialIds;
//! use quotesync_store::{MemoryStore, RecordStore};
//!
//! let mut store = RecordStore::new(Arc::new(MemoryStore::new()), Arc::new(SequentialIds::new("q")));
//! store.load();
//! assert_eq!(store.len(), 3);
//!
//! let added = store.add("Less is more.", "Design", Some("Mies")).unwrap();
//! assert_eq!(added.category, "design");
//! ```

mod error;
mod kv;
mod record_store;

pub use error::{StoreError, StoreResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use record_store::{RecordStore, StoreKeys};
