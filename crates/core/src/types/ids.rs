//! Id generation for new records

use crate::types::RecordId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh record identifiers
pub trait IdGenerator: Send + Sync {
    /// Returns an id this generator has not returned before
    fn next_id(&self) -> RecordId;
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> RecordId {
        RecordId::new()
    }
}

/// Deterministic `<prefix>-<n>` ids, counting from 1
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    /// Creates a generator with the given prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> RecordId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        RecordId::from_string(format!("{}-{}", self.prefix, n))
    }
}
