//! Breeding and litter records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates::days_between;
use super::ids::RecordId;

/// Largest litter a single kindling may record.
pub const MAX_LITTER_SIZE: u32 = 24;

/// Breeding progress.
///
/// `Planned` is the only state with outgoing transitions: to `Mated` when a
/// litter is recorded, or to `Failed` when explicitly marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreedingStatus {
    Planned,
    Mated,
    Failed,
}

impl BreedingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreedingStatus::Planned => "Planned",
            BreedingStatus::Mated => "Mated",
            BreedingStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breeding {
    pub id: RecordId,
    pub buck_id: RecordId,
    pub doe_id: RecordId,
    pub breeding_date: DateTime<Utc>,
    pub expected_due_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub status: BreedingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Breeding {
    /// Days until the expected kindling; negative once overdue.
    pub fn days_to_due(&self, today: DateTime<Utc>) -> i64 {
        days_between(today, self.expected_due_date)
    }

    pub fn is_open(&self) -> bool {
        self.status == BreedingStatus::Planned
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBreeding {
    pub buck_id: RecordId,
    pub doe_id: RecordId,
    pub breeding_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewBreeding {
    pub fn new(buck_id: RecordId, doe_id: RecordId, breeding_date: DateTime<Utc>) -> Self {
        Self {
            buck_id,
            doe_id,
            breeding_date,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Litter {
    pub id: RecordId,
    pub breeding_id: RecordId,
    pub kindling_date: DateTime<Utc>,
    pub num_kits_born: Option<u32>,
    pub num_kits_alive: Option<u32>,
    pub num_kits_weaned: Option<u32>,
    pub wean_date: Option<DateTime<Utc>>,
    pub tag_prefix: Option<String>,
    /// Rabbits materialized for this litter, in tag order.
    pub kit_ids: Vec<RecordId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Litter {
    /// Weaned kits as a percentage of kits born.
    pub fn success_rate(&self) -> f64 {
        match self.num_kits_born {
            Some(born) if born > 0 => {
                f64::from(self.num_kits_weaned.unwrap_or(0)) / f64::from(born) * 100.0
            }
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KitCounts {
    #[serde(default)]
    pub born: Option<u32>,
    #[serde(default)]
    pub alive: Option<u32>,
    #[serde(default)]
    pub weaned: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLitter {
    pub breeding_id: RecordId,
    pub kindling_date: DateTime<Utc>,
    #[serde(default)]
    pub counts: KitCounts,
    #[serde(default)]
    pub wean_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tag_prefix: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewLitter {
    pub fn new(breeding_id: RecordId, kindling_date: DateTime<Utc>) -> Self {
        Self {
            breeding_id,
            kindling_date,
            counts: KitCounts::default(),
            wean_date: None,
            tag_prefix: None,
            notes: None,
        }
    }

    pub fn born(mut self, n: u32) -> Self {
        self.counts.born = Some(n);
        self
    }

    pub fn weaned(mut self, n: u32) -> Self {
        self.counts.weaned = Some(n);
        self
    }

    pub fn tagged(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = Some(prefix.into());
        self
    }
}
