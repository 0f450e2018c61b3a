//! Commit identity assignment
//!
//! Every successful commit gets the next identity in a strict total order.
//! The identity doubles as the version stamped on each record the commit
//! writes, so "version changed" and "someone committed over it" are the
//! same test.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};

/// Totally ordered commit identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(u64);

impl CommitId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tracks the highest commit identity and hands out the next one.
///
/// Identity 0 means "nothing committed yet" and is never assigned.
#[derive(Debug, Default)]
pub struct CommitAuthority {
    highest_commit_id: u64,
}

impl CommitAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes from a restored snapshot.
    pub fn resume_from(commit_id: u64) -> Self {
        Self {
            highest_commit_id: commit_id,
        }
    }

    pub fn next_commit_id(&self) -> CommitId {
        CommitId::new(self.highest_commit_id + 1)
    }

    /// Records a commit. Only the identity right after the highest is accepted.
    pub fn mark_committed(&mut self, commit_id: CommitId) -> StoreResult<()> {
        let expected = self.highest_commit_id + 1;
        if commit_id.value() != expected {
            return Err(StoreError::OutOfOrder {
                attempted: commit_id.value(),
                expected,
            });
        }
        self.highest_commit_id = commit_id.value();
        Ok(())
    }

    pub fn highest(&self) -> CommitId {
        CommitId::new(self.highest_commit_id)
    }
}
