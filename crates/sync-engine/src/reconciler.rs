//! Conflict detection and merge planning
//!
//! Everything here is pure: the functions look at a local and a remote
//! collection and describe what should happen, leaving it to the caller
//! to apply the result.

use crate::types::ConflictEntry;
use quotesync_core::{QuoteRecord, RecordId};
use std::collections::{HashMap, HashSet};

/// Collection computed by [`merge`], with provenance counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Remote records in remote order, then local-only records in local order
    pub records: Vec<QuoteRecord>,
    /// Records taken from the remote collection
    pub from_remote: usize,
    /// Local records the remote has never seen
    pub local_only: usize,
}

/// What a cycle should do with a fetched remote collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Stop and wait for a resolution
    Conflicts(Vec<ConflictEntry>),
    /// Safe to apply and publish
    Merged(MergePlan),
}

/// Finds local records the remote has moved past
///
/// A local record conflicts when the remote holds the same id at a strictly
/// higher version. Equal or lower remote versions count as consistent, so
/// local wins ties. Entries come out in local order.
pub fn detect_conflicts(local: &[QuoteRecord], remote: &[QuoteRecord]) -> Vec<ConflictEntry> {
    let mut remote_by_id: HashMap<&RecordId, &QuoteRecord> = HashMap::with_capacity(remote.len());
    for r in remote {
        remote_by_id.entry(&r.id).or_insert(r);
    }

    local
        .iter()
        .filter_map(|l| {
            remote_by_id
                .get(&l.id)
                .filter(|r| r.version > l.version)
                .map(|r| ConflictEntry::new(l.clone(), (*r).clone()))
        })
        .collect()
}

/// Remote collection as the base plus every local-only record
///
/// Records present on both sides are taken from the remote whole; no
/// per-field merging happens. A remote id that appears more than once
/// keeps its first occurrence.
pub fn merge(local: &[QuoteRecord], remote: &[QuoteRecord]) -> Vec<QuoteRecord> {
    merge_plan(local, remote).records
}

fn merge_plan(local: &[QuoteRecord], remote: &[QuoteRecord]) -> MergePlan {
    let mut remote_ids: HashSet<&RecordId> = HashSet::with_capacity(remote.len());
    let mut records: Vec<QuoteRecord> = remote
        .iter()
        .filter(|r| remote_ids.insert(&r.id))
        .cloned()
        .collect();
    if records.len() != remote.len() {
        log::warn!(
            "Remote collection repeats {} ids; keeping the first copy of each",
            remote.len() - records.len()
        );
    }

    let before = records.len();
    records.extend(
        local
            .iter()
            .filter(|l| !remote_ids.contains(&l.id))
            .cloned(),
    );

    MergePlan {
        local_only: records.len() - before,
        from_remote: before,
        records,
    }
}

/// Detects conflicts and, if there are none, plans the merge
pub fn reconcile(local: &[QuoteRecord], remote: &[QuoteRecord]) -> ReconcileOutcome {
    let conflicts = detect_conflicts(local, remote);
    if !conflicts.is_empty() {
        log::debug!("Reconcile found {} conflicts", conflicts.len());
        return ReconcileOutcome::Conflicts(conflicts);
    }

    let plan = merge_plan(local, remote);
    log::debug!(
        "Reconcile planned merge: {} remote, {} local-only",
        plan.from_remote,
        plan.local_only
    );
    ReconcileOutcome::Merged(plan)
}
