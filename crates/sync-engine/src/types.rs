//! Sync state, status and conflict types

use chrono::{DateTime, Utc};
use quotesync_core::{QuoteRecord, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the coordinator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncPhase {
    /// Ready to start a cycle
    Idle,
    /// A cycle or resolution is running
    Syncing,
    /// Conflicts were detected and wait for a user decision
    AwaitingResolution,
}

/// How the user wants pending conflicts settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionStrategy {
    /// Push the local collection to the remote
    KeepLocal,
    /// Adopt the remote snapshot locally
    KeepRemote,
    /// Merge the snapshot into the local collection and push
    Merge,
}

impl ResolutionStrategy {
    /// All strategies, in display order
    pub const ALL: [ResolutionStrategy; 3] = [Self::KeepLocal, Self::KeepRemote, Self::Merge];

    /// Stable name used in status messages and when parsing
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeepLocal => "keep-local",
            Self::KeepRemote => "keep-remote",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep-local" | "local" => Ok(Self::KeepLocal),
            "keep-remote" | "remote" => Ok(Self::KeepRemote),
            "merge" => Ok(Self::Merge),
            other => Err(format!("Unknown resolution strategy: '{}'", other)),
        }
    }
}

/// User-visible status notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    /// Nothing has happened yet
    Idle,
    /// A cycle is running
    Syncing,
    /// A cycle was requested while one was running
    AlreadyInProgress,
    /// Conflicts need a decision
    ConflictsDetected(usize),
    /// Last cycle succeeded at the given time
    Synced(DateTime<Utc>),
    /// Pending conflicts were settled with the given strategy
    Resolved(ResolutionStrategy),
    /// Last cycle or resolution failed
    Error(String),
}

impl SyncStatus {
    /// Returns true for failure notices
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Syncing => write!(f, "syncing"),
            Self::AlreadyInProgress => write!(f, "sync already in progress"),
            Self::ConflictsDetected(1) => write!(f, "1 conflict detected, resolution required"),
            Self::ConflictsDetected(n) => write!(f, "{} conflicts detected, resolution required", n),
            Self::Synced(at) => write!(f, "last synced at {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            Self::Resolved(strategy) => write!(f, "conflicts resolved ({})", strategy),
            Self::Error(detail) => write!(f, "error: {}", detail),
        }
    }
}

/// A record whose local and remote copies disagree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictEntry {
    /// Shared record id
    pub id: RecordId,
    /// Local copy
    pub local: QuoteRecord,
    /// Remote copy, with a strictly higher version
    pub remote: QuoteRecord,
}

impl ConflictEntry {
    /// Creates an entry from both copies of a record
    pub fn new(local: QuoteRecord, remote: QuoteRecord) -> Self {
        Self {
            id: local.id.clone(),
            local,
            remote,
        }
    }
}

/// Conflicts awaiting a decision, with the remote collection they were found in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConflicts {
    /// Conflicting records, in local order
    pub entries: Vec<ConflictEntry>,
    /// Remote collection as fetched by the cycle that found the conflicts
    pub remote_snapshot: Vec<QuoteRecord>,
    /// When the conflicts were detected
    pub detected_at: DateTime<Utc>,
}

impl PendingConflicts {
    /// Wraps freshly detected conflicts
    pub fn new(entries: Vec<ConflictEntry>, remote_snapshot: Vec<QuoteRecord>) -> Self {
        Self {
            entries,
            remote_snapshot,
            detected_at: Utc::now(),
        }
    }

    /// Number of conflicting records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Coordinator-owned sync state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    /// Time of the last successful cycle
    pub last_sync_time: Option<DateTime<Utc>>,
    /// Whether a cycle or resolution is running
    pub in_progress: bool,
    /// Conflicts awaiting resolution
    pub pending: Option<PendingConflicts>,
    /// Category filter restored at startup
    pub selected_filter: Option<String>,
    /// Latest status notice
    pub status: SyncStatus,
}

impl SyncState {
    /// Creates an idle state
    pub fn new() -> Self {
        Self {
            last_sync_time: None,
            in_progress: false,
            pending: None,
            selected_filter: None,
            status: SyncStatus::Idle,
        }
    }

    /// Derives the lifecycle phase
    pub fn phase(&self) -> SyncPhase {
        if self.in_progress {
            SyncPhase::Syncing
        } else if self.pending.is_some() {
            SyncPhase::AwaitingResolution
        } else {
            SyncPhase::Idle
        }
    }

    /// Number of pending conflicts
    pub fn conflict_count(&self) -> usize {
        self.pending.as_ref().map_or(0, PendingConflicts::len)
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a sync cycle that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Collections were merged and pushed
    Synced {
        /// Completion time
        at: DateTime<Utc>,
        /// Size of the merged collection
        records: usize,
        /// Local-only records that were published
        local_only: usize,
    },
    /// Conflicts were found; nothing was written
    Conflicts(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, text: &str, version: u64) -> QuoteRecord {
        QuoteRecord::new(RecordId::from(id), text, "wisdom", None)
            .unwrap()
            .with_version(version)
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = SyncState::new();
        assert_eq!(state.phase(), SyncPhase::Idle);

        state.pending = Some(PendingConflicts::new(
            vec![ConflictEntry::new(record("1", "a", 1), record("1", "b", 2))],
            vec![record("1", "b", 2)],
        ));
        assert_eq!(state.phase(), SyncPhase::AwaitingResolution);
        assert_eq!(state.conflict_count(), 1);

        state.in_progress = true;
        assert_eq!(state.phase(), SyncPhase::Syncing);
    }

    #[test]
    fn test_strategy_parsing() {
        for strategy in ResolutionStrategy::ALL {
            assert_eq!(strategy.as_str().parse::<ResolutionStrategy>(), Ok(strategy));
        }
        assert_eq!("  Keep-Remote ".parse::<ResolutionStrategy>(), Ok(ResolutionStrategy::KeepRemote));
        assert!("overwrite".parse::<ResolutionStrategy>().is_err());
    }

    #[test]
    fn test_strategy_serde_names() {
        let json = serde_json::to_string(&ResolutionStrategy::KeepLocal).unwrap();
        assert_eq!(json, "\"keep-local\"");
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(SyncStatus::Syncing.to_string(), "syncing");
        assert_eq!(
            SyncStatus::ConflictsDetected(2).to_string(),
            "2 conflicts detected, resolution required"
        );
        assert_eq!(
            SyncStatus::Resolved(ResolutionStrategy::Merge).to_string(),
            "conflicts resolved (merge)"
        );
        assert!(SyncStatus::Error("timeout".into()).to_string().starts_with("error: "));
        assert!(SyncStatus::Error("timeout".into()).is_error());
    }
}
