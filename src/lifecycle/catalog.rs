//! Catalog and bookkeeping records
//!
//! Breed, Cage, Disease, FeedType, FeedLog, Weight and Expense have no
//! lifecycle of their own. Writing one runs field rules, unique-key and
//! reference checks, and nothing else, with one exception: a feed log
//! without a head count is stamped with the current Active population.

use crate::model::dates::start_of_day;
use crate::model::{
    Breed, Cage, Disease, Entity, EntityKind, Expense, FeedLog, FeedType, Rabbit, RecordId,
    Weight,
};
use crate::observability::{log_event_with_fields, Event};
use crate::store::{EntityStore, Transaction};
use crate::validation::Validate;

use super::engine::{ensure_unique, require_reference, LifecycleEngine};
use super::errors::LifecycleResult;

/// A record kind written through the generic `create` / `update`.
pub trait CatalogEntity: Entity + Validate {
    /// Canonical form: trimmed keys, dates at start of day.
    fn normalize(&mut self) {}

    /// References that must resolve.
    fn references(&self) -> Vec<(EntityKind, RecordId)> {
        Vec::new()
    }

    /// Unique-key check against the other records of this kind.
    fn check_unique<S: EntityStore>(&self, _tx: &mut Transaction<'_, S>) -> LifecycleResult<()> {
        Ok(())
    }

    /// Derived fields filled in on creation.
    fn derive<S: EntityStore>(&mut self, _tx: &mut Transaction<'_, S>) -> LifecycleResult<()> {
        Ok(())
    }
}

impl CatalogEntity for Breed {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_lowercase();
    }

    fn check_unique<S: EntityStore>(&self, tx: &mut Transaction<'_, S>) -> LifecycleResult<()> {
        ensure_unique::<S, Breed, _>(tx, self.id, "name", &self.name, |b| b.name.as_str())
    }
}

impl CatalogEntity for Cage {
    fn normalize(&mut self) {
        self.code = self.code.trim().to_string();
    }

    fn check_unique<S: EntityStore>(&self, tx: &mut Transaction<'_, S>) -> LifecycleResult<()> {
        ensure_unique::<S, Cage, _>(tx, self.id, "code", &self.code, |c| c.code.as_str())
    }
}

impl CatalogEntity for Disease {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
    }

    fn check_unique<S: EntityStore>(&self, tx: &mut Transaction<'_, S>) -> LifecycleResult<()> {
        ensure_unique::<S, Disease, _>(tx, self.id, "name", &self.name, |d| d.name.as_str())
    }
}

impl CatalogEntity for FeedType {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
    }

    fn check_unique<S: EntityStore>(&self, tx: &mut Transaction<'_, S>) -> LifecycleResult<()> {
        ensure_unique::<S, FeedType, _>(tx, self.id, "name", &self.name, |f| f.name.as_str())
    }
}

impl CatalogEntity for FeedLog {
    fn normalize(&mut self) {
        self.date = start_of_day(self.date);
    }

    fn references(&self) -> Vec<(EntityKind, RecordId)> {
        vec![(FeedType::KIND, self.feed_type_id)]
    }

    fn derive<S: EntityStore>(&mut self, tx: &mut Transaction<'_, S>) -> LifecycleResult<()> {
        if self.rabbits_covered.is_none() {
            let active = tx.query::<Rabbit, _>(|r| r.is_active())?;
            self.rabbits_covered = Some(active.len() as u32);
        }
        Ok(())
    }
}

impl CatalogEntity for Weight {
    fn normalize(&mut self) {
        self.measurement_date = start_of_day(self.measurement_date);
    }

    fn references(&self) -> Vec<(EntityKind, RecordId)> {
        vec![(Rabbit::KIND, self.rabbit_id)]
    }
}

impl CatalogEntity for Expense {
    fn normalize(&mut self) {
        self.category = self.category.trim().to_string();
        self.expense_date = start_of_day(self.expense_date);
    }
}

fn op_name(kind: EntityKind, creating: bool) -> &'static str {
    match (kind, creating) {
        (EntityKind::Breed, true) => "CREATE_BREED",
        (EntityKind::Breed, false) => "UPDATE_BREED",
        (EntityKind::Cage, true) => "CREATE_CAGE",
        (EntityKind::Cage, false) => "UPDATE_CAGE",
        (EntityKind::Disease, true) => "CREATE_DISEASE",
        (EntityKind::Disease, false) => "UPDATE_DISEASE",
        (EntityKind::FeedType, true) => "CREATE_FEED_TYPE",
        (EntityKind::FeedType, false) => "UPDATE_FEED_TYPE",
        (EntityKind::FeedLog, true) => "CREATE_FEED_LOG",
        (EntityKind::FeedLog, false) => "UPDATE_FEED_LOG",
        (EntityKind::Weight, true) => "CREATE_WEIGHT",
        (EntityKind::Weight, false) => "UPDATE_WEIGHT",
        (EntityKind::Expense, true) => "CREATE_EXPENSE",
        (EntityKind::Expense, false) => "UPDATE_EXPENSE",
        (_, true) => "CREATE_RECORD",
        (_, false) => "UPDATE_RECORD",
    }
}

impl<S: EntityStore> LifecycleEngine<S> {
    /// Inserts a catalog record. The engine assigns its timestamps.
    pub fn create<T: CatalogEntity>(&self, record: T) -> LifecycleResult<T> {
        let id_str = record.id().to_string();
        let created = self.run(op_name(T::KIND, true), &[("id", &id_str)], |tx, ctx| {
            let mut next = record.clone();
            next.normalize();
            next.touch(ctx.now, ctx.now);
            next.validate(&ctx.validation())?;
            for (kind, id) in next.references() {
                require_reference(tx, kind, id)?;
            }
            next.check_unique(tx)?;
            next.derive(tx)?;
            tx.insert(next.clone())?;
            Ok(next)
        })?;

        log_event_with_fields(
            Event::CatalogWrite,
            &[("id", &id_str), ("kind", T::KIND.as_str()), ("verb", "create")],
        );
        Ok(created)
    }

    /// Replaces a catalog record, keeping its creation time.
    pub fn update<T: CatalogEntity>(&self, record: T) -> LifecycleResult<T> {
        let id_str = record.id().to_string();
        let updated = self.run(op_name(T::KIND, false), &[("id", &id_str)], |tx, ctx| {
            let stored = tx.get::<T>(record.id())?;
            let (created_at, _) = stored.timestamps();

            let mut next = record.clone();
            next.normalize();
            next.touch(created_at, ctx.now);
            next.validate(&ctx.validation())?;
            for (kind, id) in next.references() {
                require_reference(tx, kind, id)?;
            }
            next.check_unique(tx)?;
            tx.update(next.clone())?;
            Ok(next)
        })?;

        log_event_with_fields(
            Event::CatalogWrite,
            &[("id", &id_str), ("kind", T::KIND.as_str()), ("verb", "update")],
        );
        Ok(updated)
    }
}
