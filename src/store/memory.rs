//! In-memory store
//!
//! One `RwLock` guards all tables. Reads take the shared lock briefly;
//! `apply` holds the exclusive lock while it checks expectations and
//! writes, which is what serializes racing transactions.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::model::{EntityKind, RecordId};

use super::commit::{CommitAuthority, CommitId};
use super::errors::{StoreError, StoreResult};
use super::snapshot::Snapshot;
use super::{ChangeSet, EntityStore, Expectation, StoredRecord, TableScan, Write};

#[derive(Debug, Default)]
struct Table {
    /// Commit that last wrote any row of this table.
    version: u64,
    rows: BTreeMap<RecordId, StoredRecord>,
}

#[derive(Debug, Default)]
struct State {
    authority: CommitAuthority,
    tables: HashMap<EntityKind, Table>,
}

impl State {
    fn row(&self, kind: EntityKind, id: RecordId) -> Option<&StoredRecord> {
        self.tables.get(&kind).and_then(|t| t.rows.get(&id))
    }

    fn table_version(&self, kind: EntityKind) -> u64 {
        self.tables.get(&kind).map(|t| t.version).unwrap_or(0)
    }

    fn check(&self, expectation: &Expectation) -> StoreResult<()> {
        match *expectation {
            Expectation::Record { kind, id, version } => {
                let current = self.row(kind, id).map(|r| r.version);
                if current != version {
                    return Err(StoreError::Conflict { kind, id: Some(id) });
                }
            }
            Expectation::Table { kind, version } => {
                if self.table_version(kind) != version {
                    return Err(StoreError::Conflict { kind, id: None });
                }
            }
        }
        Ok(())
    }

    fn check_write(&self, write: &Write) -> StoreResult<()> {
        let record = write.record();
        let (kind, id) = (record.kind(), record.id());
        let present = self.row(kind, id).is_some();
        match write {
            Write::Insert(_) if present => Err(StoreError::DuplicateId { kind, id }),
            Write::Update(_) if !present => Err(StoreError::NotFound { kind, id }),
            _ => Ok(()),
        }
    }
}

/// Thread-safe in-memory [`EntityStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a snapshot.
    ///
    /// Refuses snapshots with repeated ids or versions newer than the
    /// snapshot's own commit point.
    pub fn from_snapshot(snapshot: Snapshot) -> StoreResult<Self> {
        let mut state = State {
            authority: CommitAuthority::resume_from(snapshot.commit),
            tables: HashMap::new(),
        };
        for stored in snapshot.records {
            if stored.version == 0 || stored.version > snapshot.commit {
                return Err(StoreError::Corrupt(format!(
                    "record {} has version {} outside commit range 1..={}",
                    stored.record.id(),
                    stored.version,
                    snapshot.commit
                )));
            }
            let (kind, id) = (stored.record.kind(), stored.record.id());
            let table = state.tables.entry(kind).or_default();
            table.version = table.version.max(stored.version);
            if table.rows.insert(id, stored).is_some() {
                return Err(StoreError::Corrupt(format!("duplicate {} {}", kind, id)));
            }
        }
        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Copies the committed state out for persistence.
    pub fn snapshot(&self) -> StoreResult<Snapshot> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        let mut records = Vec::new();
        for kind in EntityKind::ALL {
            if let Some(table) = state.tables.get(&kind) {
                records.extend(table.rows.values().cloned());
            }
        }
        Ok(Snapshot {
            commit: state.authority.highest().value(),
            records,
        })
    }

    /// Highest commit applied so far.
    pub fn last_commit(&self) -> StoreResult<CommitId> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.authority.highest())
    }

    /// Number of committed records of a kind.
    pub fn count(&self, kind: EntityKind) -> StoreResult<usize> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.tables.get(&kind).map(|t| t.rows.len()).unwrap_or(0))
    }
}

impl EntityStore for MemoryStore {
    fn read(&self, kind: EntityKind, id: RecordId) -> StoreResult<Option<StoredRecord>> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.row(kind, id).cloned())
    }

    fn scan(&self, kind: EntityKind) -> StoreResult<TableScan> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(match state.tables.get(&kind) {
            Some(table) => TableScan {
                version: table.version,
                rows: table.rows.values().cloned().collect(),
            },
            None => TableScan {
                version: 0,
                rows: Vec::new(),
            },
        })
    }

    fn apply(&self, changes: ChangeSet) -> StoreResult<CommitId> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;

        // Validate everything before touching any table
        for expectation in &changes.expectations {
            state.check(expectation)?;
        }
        for write in &changes.writes {
            state.check_write(write)?;
        }

        if changes.writes.is_empty() {
            return Ok(state.authority.highest());
        }

        let commit = state.authority.next_commit_id();
        state.authority.mark_committed(commit)?;

        for write in changes.writes {
            let record = match write {
                Write::Insert(r) | Write::Update(r) => r,
            };
            let table = state.tables.entry(record.kind()).or_default();
            table.version = commit.value();
            table.rows.insert(
                record.id(),
                StoredRecord {
                    version: commit.value(),
                    record,
                },
            );
        }

        Ok(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cage, Entity};

    fn insert(cage: &Cage) -> ChangeSet {
        ChangeSet {
            expectations: vec![Expectation::Record {
                kind: EntityKind::Cage,
                id: cage.id,
                version: None,
            }],
            writes: vec![Write::Insert(cage.clone().into_record())],
        }
    }

    #[test]
    fn test_apply_assigns_increasing_versions() {
        let store = MemoryStore::new();
        let a = Cage::new("A", 1);
        let b = Cage::new("B", 1);
        assert_eq!(store.apply(insert(&a)).unwrap(), CommitId::new(1));
        assert_eq!(store.apply(insert(&b)).unwrap(), CommitId::new(2));
        assert_eq!(store.read(EntityKind::Cage, a.id).unwrap().unwrap().version, 1);
        assert_eq!(store.scan(EntityKind::Cage).unwrap().version, 2);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let store = MemoryStore::new();
        let cage = Cage::new("A", 1);
        store.apply(insert(&cage)).unwrap();
        let again = ChangeSet {
            expectations: vec![],
            writes: vec![Write::Insert(cage.clone().into_record())],
        };
        assert!(matches!(store.apply(again), Err(StoreError::DuplicateId { .. })));
    }

    #[test]
    fn test_update_of_missing_record_rejected() {
        let store = MemoryStore::new();
        let cage = Cage::new("A", 1);
        let changes = ChangeSet {
            expectations: vec![],
            writes: vec![Write::Update(cage.into_record())],
        };
        assert!(matches!(store.apply(changes), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_stale_expectation_conflicts_and_writes_nothing() {
        let store = MemoryStore::new();
        let cage = Cage::new("A", 1);
        store.apply(insert(&cage)).unwrap();

        let other = Cage::new("B", 1);
        let changes = ChangeSet {
            expectations: vec![Expectation::Table {
                kind: EntityKind::Cage,
                version: 0,
            }],
            writes: vec![Write::Insert(other.clone().into_record())],
        };
        assert!(store.apply(changes).unwrap_err().is_conflict());
        assert!(!store.exists::<Cage>(other.id).unwrap());
        assert_eq!(store.last_commit().unwrap(), CommitId::new(1));
    }

    #[test]
    fn test_empty_change_set_does_not_commit() {
        let store = MemoryStore::new();
        assert_eq!(store.apply(ChangeSet::default()).unwrap(), CommitId::new(0));
        assert_eq!(store.last_commit().unwrap(), CommitId::new(0));
    }

    #[test]
    fn test_typed_helpers() {
        let store = MemoryStore::new();
        let cage = Cage::new("A", 3);
        store.apply(insert(&cage)).unwrap();
        assert_eq!(store.get::<Cage>(cage.id).unwrap().capacity, 3);
        assert_eq!(store.query::<Cage, _>(|c| c.capacity > 2).unwrap().len(), 1);
        assert_eq!(store.query::<Cage, _>(|c| c.capacity > 5).unwrap().len(), 0);
        assert!(matches!(
            store.get::<Cage>(RecordId::generate()),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_snapshot_restores_versions_and_commit_point() {
        let store = MemoryStore::new();
        let cage = Cage::new("A", 1);
        store.apply(insert(&cage)).unwrap();
        store.apply(insert(&Cage::new("B", 1))).unwrap();

        let restored = MemoryStore::from_snapshot(store.snapshot().unwrap()).unwrap();
        assert_eq!(restored.last_commit().unwrap(), CommitId::new(2));
        assert_eq!(restored.count(EntityKind::Cage).unwrap(), 2);
        assert_eq!(restored.read(EntityKind::Cage, cage.id).unwrap().unwrap().version, 1);
        assert_eq!(restored.scan(EntityKind::Cage).unwrap().version, 2);
    }

    #[test]
    fn test_snapshot_with_future_version_refused() {
        let cage = Cage::new("A", 1);
        let snapshot = Snapshot {
            commit: 1,
            records: vec![StoredRecord {
                version: 7,
                record: cage.into_record(),
            }],
        };
        assert!(matches!(
            MemoryStore::from_snapshot(snapshot),
            Err(StoreError::Corrupt(_))
        ));
    }
}
