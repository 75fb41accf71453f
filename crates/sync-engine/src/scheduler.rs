//! Periodic sync trigger

use crate::engine::SyncCoordinator;
use crate::error::SyncError;
use crate::gateway::RemoteGateway;
use crate::types::SyncOutcome;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Runs a first cycle shortly after start, then one per interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncScheduler {
    interval: Duration,
    initial_delay: Duration,
}

impl SyncScheduler {
    /// Creates a scheduler; a zero interval is raised to one millisecond
    pub fn new(interval: Duration, initial_delay: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            initial_delay,
        }
    }

    /// Time between cycles
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time before the first cycle
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Starts the timer task on the current Tokio runtime
    ///
    /// Each tick calls [`SyncCoordinator::sync`]; failures are logged and
    /// the timer keeps going. Dropping the handle stops the timer once the
    /// current cycle, if any, has finished.
    pub fn spawn<G>(&self, coordinator: Arc<SyncCoordinator<G>>) -> SchedulerHandle
    where
        G: RemoteGateway + 'static,
    {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.initial_delay, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!(
            "Scheduling sync every {:?} (first in {:?})",
            self.interval,
            self.initial_delay
        );

        let (shutdown, mut stopped) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {}
                }

                match coordinator.sync().await {
                    Ok(SyncOutcome::Synced { records, .. }) => {
                        log::debug!("Scheduled sync finished with {} quotes", records)
                    }
                    Ok(SyncOutcome::Conflicts(count)) => {
                        log::info!("Scheduled sync waiting on {} conflicts", count)
                    }
                    Err(SyncError::AlreadyInProgress) => {
                        log::debug!("Scheduled sync skipped: already in progress")
                    }
                    Err(e) => log::warn!("Scheduled sync failed: {}", e),
                }
            }
            log::debug!("Sync scheduler stopped");
        });

        SchedulerHandle { shutdown, task }
    }
}

/// Owns the running timer task
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stops the timer and waits for an in-flight cycle to finish
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            log::warn!("Sync scheduler task ended abnormally: {}", e);
        }
    }

    /// Returns true while the timer task is alive
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}
