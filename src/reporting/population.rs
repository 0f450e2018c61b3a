//! Head counts

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::dates::{add_days, REPORT_WINDOW_DAYS};
use crate::model::{Breed, Gender, HealthRecord, Rabbit, RecordId, StatusKind};
use crate::store::{EntityStore, StoreResult};

const UNKNOWN_BREED: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreedCount {
    pub breed: String,
    pub count: u64,
}

/// Counts over every rabbit ever recorded, retired ones included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulationStats {
    pub total: u64,
    pub male: u64,
    pub female: u64,
    pub active: u64,
    pub sold: u64,
    pub deceased: u64,
    pub culled: u64,
    pub sick: u64,
    pub pregnant: u64,
    pub mature: u64,
    /// Largest group first; ties by name.
    pub by_breed: Vec<BreedCount>,
}

pub fn population_stats<S: EntityStore>(
    store: &S,
    today: DateTime<Utc>,
) -> StoreResult<PopulationStats> {
    let rabbits = store.query::<Rabbit, _>(|_| true)?;
    let breeds: BTreeMap<RecordId, String> = store
        .query::<Breed, _>(|_| true)?
        .into_iter()
        .map(|b| (b.id, b.name))
        .collect();

    let count = |pred: &dyn Fn(&Rabbit) -> bool| rabbits.iter().filter(|r| pred(r)).count() as u64;
    let with_status = |kind: StatusKind| count(&|r: &Rabbit| r.status.kind() == kind);

    let mut per_breed: BTreeMap<String, u64> = BTreeMap::new();
    for rabbit in &rabbits {
        let name = rabbit
            .breed_id
            .and_then(|id| breeds.get(&id).cloned())
            .unwrap_or_else(|| UNKNOWN_BREED.to_string());
        *per_breed.entry(name).or_default() += 1;
    }
    let mut by_breed: Vec<BreedCount> = per_breed
        .into_iter()
        .map(|(breed, count)| BreedCount { breed, count })
        .collect();
    by_breed.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.breed.cmp(&b.breed)));

    Ok(PopulationStats {
        total: rabbits.len() as u64,
        male: count(&|r: &Rabbit| r.gender == Gender::Male),
        female: count(&|r: &Rabbit| r.gender == Gender::Female),
        active: with_status(StatusKind::Active),
        sold: with_status(StatusKind::Sold),
        deceased: with_status(StatusKind::Deceased),
        culled: with_status(StatusKind::Culled),
        sick: sick_count(store, today)?,
        pregnant: count(&|r: &Rabbit| r.is_pregnant),
        mature: count(&|r: &Rabbit| r.is_mature(today)),
        by_breed,
    })
}

/// Distinct rabbits with a health record in the last 30 days.
pub fn sick_count<S: EntityStore>(store: &S, today: DateTime<Utc>) -> StoreResult<u64> {
    let since = add_days(today, -REPORT_WINDOW_DAYS);
    let sick: BTreeSet<RecordId> = store
        .query::<HealthRecord, _>(|h| h.record_date >= since)?
        .into_iter()
        .map(|h| h.rabbit_id)
        .collect();
    Ok(sick.len() as u64)
}
