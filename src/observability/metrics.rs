//! Metrics registry
//!
//! - Counters only (no gauges, no histograms)
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one engine.
///
/// Relaxed ordering throughout: counters are read for reporting only and
/// never drive control flow.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    operations_committed: AtomicU64,
    operations_rejected: AtomicU64,
    commit_conflicts: AtomicU64,
    kits_created: AtomicU64,
    animals_retired: AtomicU64,
    snapshots_saved: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_committed(&self) {
        self.operations_committed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.operations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_conflicts(&self) {
        self.commit_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_kits(&self, kits: u64) {
        self.kits_created.fetch_add(kits, Ordering::Relaxed);
    }

    pub fn increment_retired(&self) {
        self.animals_retired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_snapshots(&self) {
        self.snapshots_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            operations_committed: self.operations_committed.load(Ordering::Relaxed),
            operations_rejected: self.operations_rejected.load(Ordering::Relaxed),
            commit_conflicts: self.commit_conflicts.load(Ordering::Relaxed),
            kits_created: self.kits_created.load(Ordering::Relaxed),
            animals_retired: self.animals_retired.load(Ordering::Relaxed),
            snapshots_saved: self.snapshots_saved.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of every counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub operations_committed: u64,
    pub operations_rejected: u64,
    pub commit_conflicts: u64,
    pub kits_created: u64,
    pub animals_retired: u64,
    pub snapshots_saved: u64,
}
