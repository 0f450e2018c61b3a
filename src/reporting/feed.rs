//! Feed use against recommendation, and weight by breed

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::dates::{add_days, REPORT_WINDOW_DAYS};
use crate::model::{Breed, FeedLog, FeedType, Rabbit, RecordId, Weight};
use crate::store::{EntityStore, StoreResult};

/// One feed type over the last 30 days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedConsumption {
    pub feed_type_id: RecordId,
    pub feed_type: String,
    pub total_used: f64,
    /// Daily recommendation x average rabbits covered x 30.
    pub recommended: f64,
    /// `total_used - recommended`; positive means overfeeding.
    pub variance: f64,
}

/// Consumption per feed type from logs dated within the last 30 days.
///
/// Logs whose feed type no longer resolves are skipped. The average head
/// count ignores logs without one.
pub fn feed_consumption<S: EntityStore>(
    store: &S,
    today: DateTime<Utc>,
) -> StoreResult<Vec<FeedConsumption>> {
    let since = add_days(today, -REPORT_WINDOW_DAYS);
    let feed_types: BTreeMap<RecordId, FeedType> = store
        .query::<FeedType, _>(|_| true)?
        .into_iter()
        .map(|f| (f.id, f))
        .collect();

    let mut grouped: BTreeMap<RecordId, Vec<FeedLog>> = BTreeMap::new();
    for log in store.query::<FeedLog, _>(|l| l.date >= since)? {
        grouped.entry(log.feed_type_id).or_default().push(log);
    }

    let mut report = Vec::new();
    for (feed_type_id, logs) in grouped {
        let Some(feed_type) = feed_types.get(&feed_type_id) else {
            continue;
        };
        let total_used: f64 = logs.iter().map(|l| l.quantity_used).sum();
        let covered: Vec<f64> = logs
            .iter()
            .filter_map(|l| l.rabbits_covered)
            .map(f64::from)
            .collect();
        let avg_rabbits = if covered.is_empty() {
            0.0
        } else {
            covered.iter().sum::<f64>() / covered.len() as f64
        };
        let recommended =
            feed_type.daily_recommendation_per_rabbit * avg_rabbits * REPORT_WINDOW_DAYS as f64;

        report.push(FeedConsumption {
            feed_type_id,
            feed_type: feed_type.name.clone(),
            total_used,
            recommended,
            variance: total_used - recommended,
        });
    }
    report.sort_by(|a, b| a.feed_type.cmp(&b.feed_type));
    Ok(report)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreedWeight {
    pub breed_id: RecordId,
    pub breed_name: String,
    /// Mean of every weight measurement taken on rabbits of the breed.
    pub average_weight: f64,
    pub measurements: u64,
}

pub fn average_weight_by_breed<S: EntityStore>(
    store: &S,
    breed_id: RecordId,
) -> StoreResult<BreedWeight> {
    let breed_name = store
        .query::<Breed, _>(|b| b.id == breed_id)?
        .into_iter()
        .next()
        .map(|b| b.name)
        .unwrap_or_else(|| "Unknown".to_string());
    let members: Vec<RecordId> = store
        .query::<Rabbit, _>(|r| r.breed_id == Some(breed_id))?
        .into_iter()
        .map(|r| r.id)
        .collect();
    let weights = store.query::<Weight, _>(|w| members.contains(&w.rabbit_id))?;

    let average_weight = if weights.is_empty() {
        0.0
    } else {
        weights.iter().map(|w| w.weight_kg).sum::<f64>() / weights.len() as f64
    };

    Ok(BreedWeight {
        breed_id,
        breed_name,
        average_weight,
        measurements: weights.len() as u64,
    })
}
