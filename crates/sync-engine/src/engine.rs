//! Sync coordinator
//!
//! One cycle fetches the remote collection, reconciles it with the local
//! one and either suspends on conflicts or applies the merge and publishes
//! it. The `in_progress` flag is the only guard: a second caller is turned
//! away rather than queued.

use crate::error::{SyncError, SyncResult};
use crate::gateway::RemoteGateway;
use crate::reconciler::{reconcile, MergePlan, ReconcileOutcome};
use crate::resolver::{ConflictResolver, ResolutionReport};
use crate::types::{
    PendingConflicts, ResolutionStrategy, SyncOutcome, SyncPhase, SyncState, SyncStatus,
};
use chrono::Utc;
use quotesync_core::QuoteRecord;
use quotesync_store::RecordStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared local state: the record store and the sync state
///
/// Locks are taken briefly and never held across a gateway call.
pub struct SyncContext {
    store: Mutex<RecordStore>,
    state: Mutex<SyncState>,
}

impl SyncContext {
    /// Loads `store` and restores the selected filter
    pub fn new(mut store: RecordStore) -> Self {
        store.load();

        let state = SyncState {
            selected_filter: store.selected_filter(),
            ..SyncState::new()
        };

        Self {
            store: Mutex::new(store),
            state: Mutex::new(state),
        }
    }

    pub(crate) fn lock_store(&self) -> SyncResult<MutexGuard<'_, RecordStore>> {
        self.store
            .lock()
            .map_err(|_| SyncError::Custom("Lock poisoned".to_string()))
    }

    pub(crate) fn lock_state(&self) -> SyncResult<MutexGuard<'_, SyncState>> {
        self.state
            .lock()
            .map_err(|_| SyncError::Custom("Lock poisoned".to_string()))
    }

    /// Locks the sync state even after a panic poisoned it
    ///
    /// Used to close out a cycle, where bailing out would leave
    /// `in_progress` set for good.
    pub(crate) fn lock_state_recovering(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            log::warn!("Sync state lock was poisoned, recovering");
            self.state.clear_poison();
            PoisonError::into_inner(poisoned)
        })
    }

    /// Copy of the local collection
    pub fn records(&self) -> SyncResult<Vec<QuoteRecord>> {
        Ok(self.lock_store()?.records().to_vec())
    }

    /// Adds a quote to the local collection
    pub fn add_quote(
        &self,
        text: &str,
        category: &str,
        author: Option<&str>,
    ) -> SyncResult<QuoteRecord> {
        Ok(self.lock_store()?.add(text, category, author)?)
    }

    /// Swaps in a new local collection and persists it
    pub fn replace_records(&self, records: Vec<QuoteRecord>) -> SyncResult<()> {
        Ok(self.lock_store()?.replace(records)?)
    }

    /// Clears the pending-changes flag if the collection still equals `published`
    pub(crate) fn mark_published(&self, published: &[QuoteRecord]) -> SyncResult<()> {
        let mut store = self.lock_store()?;
        if store.records() == published {
            store.mark_synced();
        }
        Ok(())
    }

    /// Returns true if local changes have not been published yet
    pub fn has_pending_changes(&self) -> SyncResult<bool> {
        Ok(self.lock_store()?.has_pending_changes())
    }

    /// Distinct categories in the local collection
    pub fn categories(&self) -> SyncResult<Vec<String>> {
        Ok(self.lock_store()?.categories())
    }

    /// Local records in the selected category, or all of them
    pub fn filtered_records(&self) -> SyncResult<Vec<QuoteRecord>> {
        let filter = self.lock_state()?.selected_filter.clone();
        let store = self.lock_store()?;
        Ok(store
            .filtered(filter.as_deref())
            .into_iter()
            .cloned()
            .collect())
    }

    /// Selects and persists a category filter; `None` or `"all"` clears it
    pub fn set_filter(&self, category: Option<&str>) -> SyncResult<Option<String>> {
        let selected = self.lock_store()?.set_selected_filter(category)?;
        self.lock_state()?.selected_filter = selected.clone();
        Ok(selected)
    }

    /// Snapshot of the sync state
    pub fn state(&self) -> SyncResult<SyncState> {
        self.lock_state().map(|s| s.clone())
    }

    /// Latest status notice
    pub fn status(&self) -> SyncResult<SyncStatus> {
        self.lock_state().map(|s| s.status.clone())
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SyncResult<SyncPhase> {
        self.lock_state().map(|s| s.phase())
    }

    /// Conflicts waiting for a resolution, if any
    pub fn pending_conflicts(&self) -> SyncResult<Option<PendingConflicts>> {
        self.lock_state().map(|s| s.pending.clone())
    }
}

enum CycleEnd {
    Merged(MergePlan),
    Suspended(PendingConflicts),
}

/// Runs sync cycles against a remote gateway
pub struct SyncCoordinator<G> {
    context: Arc<SyncContext>,
    gateway: G,
}

impl<G: RemoteGateway> SyncCoordinator<G> {
    /// Creates a coordinator over shared local state
    pub fn new(context: Arc<SyncContext>, gateway: G) -> Self {
        Self { context, gateway }
    }

    /// Shared local state
    pub fn context(&self) -> &Arc<SyncContext> {
        &self.context
    }

    /// The remote gateway
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Latest status notice
    pub fn status(&self) -> SyncResult<SyncStatus> {
        self.context.status()
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SyncResult<SyncPhase> {
        self.context.phase()
    }

    /// Snapshot of the sync state
    pub fn state(&self) -> SyncResult<SyncState> {
        self.context.state()
    }

    /// Conflicts waiting for a resolution, if any
    pub fn pending_conflicts(&self) -> SyncResult<Option<PendingConflicts>> {
        self.context.pending_conflicts()
    }

    /// Runs one sync cycle
    ///
    /// Fails with [`SyncError::AlreadyInProgress`] without touching the
    /// remote if a cycle is running or conflicts are still pending.
    pub async fn sync(&self) -> SyncResult<SyncOutcome> {
        // Mark sync as in progress
        {
            let mut state = self.context.lock_state()?;
            if state.in_progress || state.pending.is_some() {
                log::info!("Sync requested while {:?}, skipping", state.phase());
                state.status = SyncStatus::AlreadyInProgress;
                return Err(SyncError::AlreadyInProgress);
            }
            state.in_progress = true;
            state.status = SyncStatus::Syncing;
        }

        let result = self.run_cycle().await;

        let mut state = self.context.lock_state_recovering();
        state.in_progress = false;

        match result {
            Ok(CycleEnd::Merged(plan)) => {
                let at = Utc::now();
                state.last_sync_time = Some(at);
                state.status = SyncStatus::Synced(at);
                log::info!(
                    "Sync complete: {} quotes ({} published from local)",
                    plan.records.len(),
                    plan.local_only
                );
                Ok(SyncOutcome::Synced {
                    at,
                    records: plan.records.len(),
                    local_only: plan.local_only,
                })
            }
            Ok(CycleEnd::Suspended(pending)) => {
                let count = pending.len();
                state.status = SyncStatus::ConflictsDetected(count);
                state.pending = Some(pending);
                log::warn!("Sync suspended: {} conflicts need resolution", count);
                Ok(SyncOutcome::Conflicts(count))
            }
            Err(e) => {
                state.status = SyncStatus::Error(e.to_string());
                log::error!("Sync failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_cycle(&self) -> SyncResult<CycleEnd> {
        let remote = self.gateway.fetch_all().await?;
        let local = self.context.records()?;

        match reconcile(&local, &remote) {
            ReconcileOutcome::Conflicts(entries) => {
                Ok(CycleEnd::Suspended(PendingConflicts::new(entries, remote)))
            }
            ReconcileOutcome::Merged(plan) => {
                // Applied before the push; a failed push leaves the merge in place
                self.context.replace_records(plan.records.clone())?;
                self.gateway.push_all(&plan.records).await?;
                self.context.mark_published(&plan.records)?;
                Ok(CycleEnd::Merged(plan))
            }
        }
    }

    /// Settles the pending conflicts with `strategy`
    pub async fn resolve(&self, strategy: ResolutionStrategy) -> SyncResult<ResolutionReport> {
        ConflictResolver::new(&self.context, &self.gateway)
            .resolve(strategy)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::KvRemoteGateway;
    use async_trait::async_trait;
    use quotesync_core::{default_quotes, RecordId, SequentialIds};
    use quotesync_store::{KeyValueStore, MemoryStore};

    struct UnreachableGateway;

    #[async_trait]
    impl RemoteGateway for UnreachableGateway {
        async fn fetch_all(&self) -> SyncResult<Vec<QuoteRecord>> {
            Err(SyncError::Transport("connection refused".to_string()))
        }

        async fn push_all(&self, _records: &[QuoteRecord]) -> SyncResult<()> {
            Err(SyncError::Transport("connection refused".to_string()))
        }
    }

    /// Poisons the state lock mid-cycle, then fails the fetch
    struct PoisoningGateway(Arc<SyncContext>);

    #[async_trait]
    impl RemoteGateway for PoisoningGateway {
        async fn fetch_all(&self) -> SyncResult<Vec<QuoteRecord>> {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let _guard = self.0.state.lock();
                panic!("worker died holding the state lock");
            }));
            Err(SyncError::Transport("connection reset".to_string()))
        }

        async fn push_all(&self, _records: &[QuoteRecord]) -> SyncResult<()> {
            Ok(())
        }
    }

    fn context(backend: Arc<MemoryStore>) -> Arc<SyncContext> {
        let store = RecordStore::new(backend, Arc::new(SequentialIds::new("q")));
        Arc::new(SyncContext::new(store))
    }

    #[tokio::test]
    async fn test_first_sync_publishes_defaults() {
        let backend = Arc::new(MemoryStore::new());
        let coordinator = SyncCoordinator::new(
            context(backend.clone()),
            KvRemoteGateway::new(backend.clone(), "remote_quotes"),
        );

        let outcome = coordinator.sync().await.unwrap();
        assert!(matches!(
            outcome,
            SyncOutcome::Synced { records: 3, local_only: 3, .. }
        ));

        let state = coordinator.state().unwrap();
        assert!(!state.in_progress);
        assert!(state.last_sync_time.is_some());
        assert!(matches!(state.status, SyncStatus::Synced(_)));
        assert_eq!(coordinator.phase().unwrap(), SyncPhase::Idle);
        assert!(!coordinator.context().has_pending_changes().unwrap());

        let remote: Vec<QuoteRecord> =
            serde_json::from_str(&backend.get("remote_quotes").unwrap().unwrap()).unwrap();
        assert_eq!(remote, default_quotes());
    }

    #[tokio::test]
    async fn test_fetch_failure_reports_error() {
        let coordinator =
            SyncCoordinator::new(context(Arc::new(MemoryStore::new())), UnreachableGateway);

        let err = coordinator.sync().await.unwrap_err();
        assert!(err.is_transport());

        let state = coordinator.state().unwrap();
        assert!(!state.in_progress);
        assert!(state.last_sync_time.is_none());
        assert_eq!(
            state.status.to_string(),
            "error: Transport error: connection refused"
        );
        assert_eq!(coordinator.context().records().unwrap(), default_quotes());
    }

    #[tokio::test]
    async fn test_poisoned_state_lock_still_clears_in_progress() {
        let ctx = context(Arc::new(MemoryStore::new()));
        let coordinator = SyncCoordinator::new(ctx.clone(), PoisoningGateway(ctx.clone()));

        let err = coordinator.sync().await.unwrap_err();
        assert!(matches!(err, SyncError::Transport(_)));

        let state = coordinator.state().unwrap();
        assert!(!state.in_progress);
        assert!(matches!(state.status, SyncStatus::Error(_)));
        assert!(matches!(
            coordinator.sync().await,
            Err(SyncError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_conflicts_block_next_cycle() {
        let backend = Arc::new(MemoryStore::new());
        let remote = vec![QuoteRecord::new(RecordId::from("1"), "Newer text", "inspiration", None)
            .unwrap()
            .with_version(2)];
        backend
            .put("remote_quotes", &serde_json::to_string(&remote).unwrap())
            .unwrap();

        let coordinator = SyncCoordinator::new(
            context(backend.clone()),
            KvRemoteGateway::new(backend.clone(), "remote_quotes"),
        );

        assert_eq!(coordinator.sync().await.unwrap(), SyncOutcome::Conflicts(1));
        assert_eq!(coordinator.phase().unwrap(), SyncPhase::AwaitingResolution);

        let pending = coordinator.pending_conflicts().unwrap().unwrap();
        assert_eq!(pending.remote_snapshot, remote);

        assert!(matches!(
            coordinator.sync().await,
            Err(SyncError::AlreadyInProgress)
        ));
        assert_eq!(coordinator.status().unwrap(), SyncStatus::AlreadyInProgress);
        assert!(coordinator.pending_conflicts().unwrap().is_some());
    }

    #[test]
    fn test_filter_selection_persists() {
        let backend = Arc::new(MemoryStore::new());
        let ctx = context(backend.clone());

        assert_eq!(
            ctx.set_filter(Some(" Wisdom ")).unwrap(),
            Some("wisdom".to_string())
        );
        assert_eq!(ctx.filtered_records().unwrap().len(), 1);

        let restored = context(backend);
        assert_eq!(restored.state().unwrap().selected_filter, Some("wisdom".to_string()));

        restored.set_filter(Some("all")).unwrap();
        assert_eq!(restored.filtered_records().unwrap().len(), 3);
    }

    #[test]
    fn test_add_quote_validation() {
        let ctx = context(Arc::new(MemoryStore::new()));
        let err = ctx.add_quote("   ", "wisdom", None).unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)));

        let added = ctx.add_quote("Stay hungry", "Motivation", None).unwrap();
        assert_eq!(added.id.as_str(), "q-1");
        assert!(ctx.has_pending_changes().unwrap());
        assert!(ctx.categories().unwrap().contains(&"motivation".to_string()));
    }
}
