//! Unit of work over an [`EntityStore`]
//!
//! A transaction reads through to the committed state, remembers the
//! version of everything it looked at, and stages its own writes. Staged
//! writes are visible to the transaction's later reads and to nobody else.
//! `commit` hands the staged writes plus the remembered versions to the
//! store as one [`ChangeSet`]; dropping the transaction instead discards
//! everything.

use std::collections::BTreeMap;

use crate::model::{Entity, EntityKind, Record, RecordId};

use super::commit::CommitId;
use super::errors::{StoreError, StoreResult};
use super::{ChangeSet, EntityStore, Expectation, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Insert,
    Update,
}

#[derive(Debug)]
struct Staged {
    mode: Mode,
    record: Record,
}

type Key = (EntityKind, RecordId);

pub struct Transaction<'s, S: EntityStore> {
    store: &'s S,
    /// First observed version of each record read (`None`: absent).
    reads: BTreeMap<Key, Option<u64>>,
    /// First observed version of each table scanned.
    scans: BTreeMap<EntityKind, u64>,
    staged: BTreeMap<Key, Staged>,
}

impl<'s, S: EntityStore> Transaction<'s, S> {
    pub fn begin(store: &'s S) -> Self {
        Self {
            store,
            reads: BTreeMap::new(),
            scans: BTreeMap::new(),
            staged: BTreeMap::new(),
        }
    }

    /// Looks a record up, preferring this transaction's own staged writes.
    pub fn find<T: Entity>(&mut self, id: RecordId) -> StoreResult<Option<T>> {
        let key = (T::KIND, id);
        if let Some(staged) = self.staged.get(&key) {
            return Ok(T::from_record(&staged.record).cloned());
        }
        let stored = self.store.read(T::KIND, id)?;
        self.reads
            .entry(key)
            .or_insert_with(|| stored.as_ref().map(|s| s.version));
        Ok(stored.and_then(|s| T::from_record(&s.record).cloned()))
    }

    /// Like [`find`](Self::find) but absence is an error.
    pub fn get<T: Entity>(&mut self, id: RecordId) -> StoreResult<T> {
        self.find(id)?
            .ok_or(StoreError::NotFound { kind: T::KIND, id })
    }

    pub fn exists<T: Entity>(&mut self, id: RecordId) -> StoreResult<bool> {
        Ok(self.find::<T>(id)?.is_some())
    }

    /// Untyped existence check, for references whose kind is only known
    /// at runtime.
    pub fn contains(&mut self, kind: EntityKind, id: RecordId) -> StoreResult<bool> {
        let key = (kind, id);
        if self.staged.contains_key(&key) {
            return Ok(true);
        }
        let stored = self.store.read(kind, id)?;
        self.reads
            .entry(key)
            .or_insert_with(|| stored.as_ref().map(|s| s.version));
        Ok(stored.is_some())
    }

    /// Every record of `T` passing `filter`, staged writes included.
    ///
    /// The scan pins the whole table: any commit to this kind by someone
    /// else before ours turns our commit into a conflict.
    pub fn query<T: Entity, F>(&mut self, filter: F) -> StoreResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let scan = self.store.scan(T::KIND)?;
        self.scans.entry(T::KIND).or_insert(scan.version);

        let mut merged: BTreeMap<RecordId, T> = scan
            .rows
            .iter()
            .filter_map(|stored| T::from_record(&stored.record))
            .map(|record| (record.id(), record.clone()))
            .collect();
        for ((kind, id), staged) in &self.staged {
            if *kind == T::KIND {
                if let Some(record) = T::from_record(&staged.record) {
                    merged.insert(*id, record.clone());
                }
            }
        }

        Ok(merged.into_values().filter(|r| filter(r)).collect())
    }

    /// Stages a new record.
    pub fn insert<T: Entity>(&mut self, record: T) -> StoreResult<RecordId> {
        let id = record.id();
        if self.find::<T>(id)?.is_some() {
            return Err(StoreError::DuplicateId { kind: T::KIND, id });
        }
        self.staged.insert(
            (T::KIND, id),
            Staged {
                mode: Mode::Insert,
                record: record.into_record(),
            },
        );
        Ok(id)
    }

    /// Stages a replacement of an existing record.
    pub fn update<T: Entity>(&mut self, record: T) -> StoreResult<()> {
        let id = record.id();
        let key = (T::KIND, id);
        let staged_mode = self.staged.get(&key).map(|staged| staged.mode);
        let mode = match staged_mode {
            Some(mode) => mode,
            None if self.find::<T>(id)?.is_some() => Mode::Update,
            None => return Err(StoreError::NotFound { kind: T::KIND, id }),
        };
        self.staged.insert(
            key,
            Staged {
                mode,
                record: record.into_record(),
            },
        );
        Ok(())
    }

    /// Number of staged writes.
    pub fn pending_writes(&self) -> usize {
        self.staged.len()
    }

    /// Submits every staged write as one commit.
    pub fn commit(self) -> StoreResult<CommitId> {
        let mut expectations: Vec<Expectation> = self
            .reads
            .into_iter()
            .map(|((kind, id), version)| Expectation::Record { kind, id, version })
            .collect();
        expectations.extend(
            self.scans
                .into_iter()
                .map(|(kind, version)| Expectation::Table { kind, version }),
        );

        let writes = self
            .staged
            .into_values()
            .map(|staged| match staged.mode {
                Mode::Insert => Write::Insert(staged.record),
                Mode::Update => Write::Update(staged.record),
            })
            .collect();

        self.store.apply(ChangeSet {
            expectations,
            writes,
        })
    }
}
