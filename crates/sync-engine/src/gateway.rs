//! Remote store access
//!
//! The remote collection is only ever read or written whole. Two gateways
//! ship here: one that keeps the remote copy in a key-value backend (the
//! stand-in for a server) and a decorator that bounds every call with a
//! deadline.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use quotesync_core::QuoteRecord;
use quotesync_resilience::Timeout;
use quotesync_store::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;

/// Whole-collection access to the remote store
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Retrieves the full remote collection
    async fn fetch_all(&self) -> SyncResult<Vec<QuoteRecord>>;

    /// Replaces the remote collection with `records`
    async fn push_all(&self, records: &[QuoteRecord]) -> SyncResult<()>;
}

#[async_trait]
impl<G: RemoteGateway + ?Sized> RemoteGateway for Arc<G> {
    async fn fetch_all(&self) -> SyncResult<Vec<QuoteRecord>> {
        (**self).fetch_all().await
    }

    async fn push_all(&self, records: &[QuoteRecord]) -> SyncResult<()> {
        (**self).push_all(records).await
    }
}

/// Remote collection kept as a JSON array under one key
///
/// A missing key is an empty remote. Anything that goes wrong reading or
/// writing the key surfaces as a transport error, including a payload
/// holding a record that fails [`QuoteRecord::validate`].
pub struct KvRemoteGateway {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl KvRemoteGateway {
    /// Creates a gateway over `backend`, storing the collection under `key`
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Key holding the remote collection
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl RemoteGateway for KvRemoteGateway {
    async fn fetch_all(&self) -> SyncResult<Vec<QuoteRecord>> {
        let raw = self
            .backend
            .get(&self.key)
            .map_err(|e| SyncError::Transport(format!("fetch failed: {}", e)))?;

        let records: Vec<QuoteRecord> = match raw {
            None => return Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| SyncError::Transport(format!("malformed remote payload: {}", e)))?,
        };

        for record in &records {
            record.validate().map_err(|e| {
                SyncError::Transport(format!("malformed remote record '{}': {}", record.id, e))
            })?;
        }
        Ok(records)
    }

    async fn push_all(&self, records: &[QuoteRecord]) -> SyncResult<()> {
        let json = serde_json::to_string(records)?;
        self.backend
            .put(&self.key, &json)
            .map_err(|e| SyncError::Transport(format!("push failed: {}", e)))?;

        log::debug!("Pushed {} quotes to remote '{}'", records.len(), self.key);
        Ok(())
    }
}

/// Bounds every call of the wrapped gateway with a deadline
pub struct TimeoutGateway<G> {
    inner: G,
    timeout: Timeout,
}

impl<G: RemoteGateway> TimeoutGateway<G> {
    /// Wraps `inner`; calls taking longer than `duration` fail
    pub fn new(inner: G, duration: Duration) -> Self {
        Self {
            inner,
            timeout: Timeout::new(duration),
        }
    }

    /// The wrapped gateway
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: RemoteGateway> RemoteGateway for TimeoutGateway<G> {
    async fn fetch_all(&self) -> SyncResult<Vec<QuoteRecord>> {
        self.timeout
            .execute(self.inner.fetch_all())
            .await
            .map_err(|e| SyncError::Transport(format!("fetch: {}", e)))?
    }

    async fn push_all(&self, records: &[QuoteRecord]) -> SyncResult<()> {
        self.timeout
            .execute(self.inner.push_all(records))
            .await
            .map_err(|e| SyncError::Transport(format!("push: {}", e)))?
    }
}
