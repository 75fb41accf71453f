//! Applies a resolution strategy to pending conflicts

use crate::engine::SyncContext;
use crate::error::{SyncError, SyncResult};
use crate::gateway::RemoteGateway;
use crate::reconciler::merge;
use crate::types::{PendingConflicts, ResolutionStrategy, SyncStatus};
use chrono::Utc;

/// What a successful resolution did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Strategy that was applied
    pub strategy: ResolutionStrategy,
    /// Conflicting records that were settled
    pub conflicts: usize,
    /// Size of the local collection afterwards
    pub records: usize,
    /// Whether the local collection was pushed to the remote
    pub pushed: bool,
}

/// Settles the whole pending conflict batch with one strategy
pub struct ConflictResolver<'a, G> {
    context: &'a SyncContext,
    gateway: &'a G,
}

impl<'a, G: RemoteGateway> ConflictResolver<'a, G> {
    /// Creates a resolver over shared state and the remote gateway
    pub fn new(context: &'a SyncContext, gateway: &'a G) -> Self {
        Self { context, gateway }
    }

    /// Applies `strategy` to every pending conflict
    ///
    /// The pending batch is consumed even if applying it fails; local
    /// changes made before a failed push are kept.
    pub async fn resolve(&self, strategy: ResolutionStrategy) -> SyncResult<ResolutionReport> {
        let pending = {
            let mut state = self.context.lock_state()?;
            if state.in_progress {
                return Err(SyncError::AlreadyInProgress);
            }
            let pending = state.pending.take().ok_or(SyncError::NoPendingConflicts)?;
            state.in_progress = true;
            state.status = SyncStatus::Syncing;
            pending
        };

        log::info!(
            "Resolving {} conflicts with {}",
            pending.len(),
            strategy
        );
        let result = self.apply(strategy, &pending).await;

        let mut state = self.context.lock_state_recovering();
        state.in_progress = false;

        match result {
            Ok(report) => {
                if report.pushed {
                    state.last_sync_time = Some(Utc::now());
                }
                state.status = SyncStatus::Resolved(strategy);
                Ok(report)
            }
            Err(e) => {
                state.status = SyncStatus::Error(e.to_string());
                log::error!("Resolution with {} failed: {}", strategy, e);
                Err(e)
            }
        }
    }

    async fn apply(
        &self,
        strategy: ResolutionStrategy,
        pending: &PendingConflicts,
    ) -> SyncResult<ResolutionReport> {
        let records = match strategy {
            ResolutionStrategy::KeepLocal => {
                let local = self.context.records()?;
                self.gateway.push_all(&local).await?;
                local
            }
            ResolutionStrategy::KeepRemote => {
                let remote = pending.remote_snapshot.clone();
                self.context.replace_records(remote.clone())?;
                remote
            }
            ResolutionStrategy::Merge => {
                let merged = merge(&self.context.records()?, &pending.remote_snapshot);
                self.context.replace_records(merged.clone())?;
                self.gateway.push_all(&merged).await?;
                merged
            }
        };

        // Local now matches what the remote holds
        self.context.mark_published(&records)?;

        Ok(ResolutionReport {
            strategy,
            conflicts: pending.len(),
            records: records.len(),
            pushed: strategy != ResolutionStrategy::KeepRemote,
        })
    }
}
