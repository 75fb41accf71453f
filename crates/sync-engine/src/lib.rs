//! Local/remote synchronization for the quote collection
//!
//! This crate keeps the local quote collection consistent with a remote store:
//! - Remote gateway abstraction with a simulated key-value backend
//! - Reconciliation: conflict detection and merge planning
//! - A single-flight sync coordinator with status reporting
//! - Conflict resolution (keep-local, keep-remote, merge)
//! - A periodic scheduler
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use quotesync_core::UuidGenerator;
//! use quotesync_store::{MemoryStore, RecordStore};
//! use quotesync_sync_engine::{KvRemoteGateway, SyncContext, SyncCoordinator};
//!
//! # async fn demo() -> Result<(), quotesync_sync_engine::SyncError> {
//! let backend = Arc::new(MemoryStore::new());
//! let store = RecordStore::new(backend.clone(), Arc::new(UuidGenerator));
//! let context = Arc::new(SyncContext::new(store));
//! let coordinator = SyncCoordinator::new(context, KvRemoteGateway::new(backend, "remote_quotes"));
//!
//! coordinator.context().add_quote("Simplicity is prerequisite for reliability.", "software", Some("Dijkstra"))?;
//! let outcome = coordinator.sync().await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod gateway;
mod reconciler;
mod resolver;
mod scheduler;
mod types;

pub use engine::{SyncContext, SyncCoordinator};
pub use error::{SyncError, SyncResult};
pub use gateway::{KvRemoteGateway, RemoteGateway, TimeoutGateway};
pub use reconciler::{detect_conflicts, merge, reconcile, MergePlan, ReconcileOutcome};
pub use resolver::{ConflictResolver, ResolutionReport};
pub use scheduler::{SchedulerHandle, SyncScheduler};
pub use types::{
    ConflictEntry, PendingConflicts, ResolutionStrategy, SyncOutcome, SyncPhase, SyncState,
    SyncStatus,
};
