//! Entity Store
//!
//! Canonical record storage for every entity kind.
//!
//! # Consistency contract
//!
//! - Reads always see the latest committed state; there is no cache
//! - Writes are staged in a [`Transaction`] and become visible together
//! - A commit fails with a conflict if any record or table the
//!   transaction read has been committed over since
//! - Dropping an uncommitted transaction discards its staged writes

mod checksum;
mod commit;
mod errors;
mod memory;
mod snapshot;
mod transaction;

pub use checksum::{compute_checksum, verify_checksum};
pub use commit::{CommitAuthority, CommitId};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use snapshot::{load_snapshot, save_snapshot, Snapshot};
pub use transaction::Transaction;

use serde::{Deserialize, Serialize};

use crate::model::{Entity, EntityKind, Record, RecordId};

/// A committed record and the commit that last wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub version: u64,
    pub record: Record,
}

/// Every committed record of one kind, read at a single table version.
#[derive(Debug, Clone)]
pub struct TableScan {
    pub version: u64,
    pub rows: Vec<StoredRecord>,
}

/// A condition the committed state must still satisfy at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// The record is still at `version` (`None`: still absent).
    Record {
        kind: EntityKind,
        id: RecordId,
        version: Option<u64>,
    },
    /// No record of the kind was written since `version`.
    Table { kind: EntityKind, version: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Insert(Record),
    Update(Record),
}

impl Write {
    pub fn record(&self) -> &Record {
        match self {
            Write::Insert(r) | Write::Update(r) => r,
        }
    }
}

/// Everything one transaction wants to commit.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub expectations: Vec<Expectation>,
    pub writes: Vec<Write>,
}

/// Storage backend seen by the lifecycle engine.
///
/// Implementations apply a [`ChangeSet`] atomically: either every
/// expectation holds and every write lands under one commit identity, or
/// nothing changes.
pub trait EntityStore: Send + Sync {
    /// Latest committed state of one record.
    fn read(&self, kind: EntityKind, id: RecordId) -> StoreResult<Option<StoredRecord>>;

    /// Every committed record of a kind, ordered by id.
    fn scan(&self, kind: EntityKind) -> StoreResult<TableScan>;

    /// Checks expectations and applies writes as one commit.
    fn apply(&self, changes: ChangeSet) -> StoreResult<CommitId>;

    /// Typed read; `NotFound` when absent.
    fn get<T: Entity>(&self, id: RecordId) -> StoreResult<T> {
        self.read(T::KIND, id)?
            .and_then(|stored| T::from_record(&stored.record).cloned())
            .ok_or(StoreError::NotFound { kind: T::KIND, id })
    }

    fn exists<T: Entity>(&self, id: RecordId) -> StoreResult<bool> {
        Ok(self.read(T::KIND, id)?.is_some())
    }

    /// Typed scan keeping the records that pass `filter`.
    fn query<T: Entity, F>(&self, filter: F) -> StoreResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let scan = self.scan(T::KIND)?;
        Ok(scan
            .rows
            .iter()
            .filter_map(|stored| T::from_record(&stored.record))
            .filter(|record| filter(record))
            .cloned()
            .collect())
    }
}
