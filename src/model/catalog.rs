//! Catalog and bookkeeping records
//!
//! These kinds carry field validation and reference checks only; writing
//! them never cascades into other records.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ids::RecordId;

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breed {
    #[serde(default = "RecordId::generate")]
    pub id: RecordId,
    /// Stored lowercased.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub average_weight_kg: Option<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub recommended_feed: Option<String>,
    #[serde(default = "default_maturity_age")]
    pub maturity_age_days: u32,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

fn default_maturity_age() -> u32 {
    112
}

impl Breed {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::generate(),
            name: name.into(),
            description: None,
            average_weight_kg: None,
            colors: Vec::new(),
            recommended_feed: None,
            maturity_age_days: default_maturity_age(),
            created_at: epoch(),
            updated_at: epoch(),
        }
    }

    /// Heavier than 4 kg on average.
    pub fn is_meat_breed(&self) -> bool {
        self.average_weight_kg.is_some_and(|w| w > 4.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cage {
    #[serde(default = "RecordId::generate")]
    pub id: RecordId,
    pub code: String,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

fn default_capacity() -> u32 {
    1
}

impl Cage {
    pub fn new(code: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: RecordId::generate(),
            code: code.into(),
            capacity,
            location: None,
            notes: None,
            created_at: epoch(),
            updated_at: epoch(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    #[serde(default = "RecordId::generate")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub treatments: Vec<String>,
    #[serde(default)]
    pub prevention: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

impl Disease {
    pub fn new(name: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: RecordId::generate(),
            name: name.into(),
            symptoms: Vec::new(),
            treatments: Vec::new(),
            prevention: None,
            severity,
            created_at: epoch(),
            updated_at: epoch(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedType {
    #[serde(default = "RecordId::generate")]
    pub id: RecordId,
    pub name: String,
    pub unit: String,
    #[serde(default = "default_daily_recommendation")]
    pub daily_recommendation_per_rabbit: f64,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub cost_per_unit: Option<f64>,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

fn default_daily_recommendation() -> f64 {
    100.0
}

impl FeedType {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, daily: f64) -> Self {
        Self {
            id: RecordId::generate(),
            name: name.into(),
            unit: unit.into(),
            daily_recommendation_per_rabbit: daily,
            frequency: None,
            cost_per_unit: None,
            created_at: epoch(),
            updated_at: epoch(),
        }
    }

    /// Per-rabbit need over a week.
    ///
    /// A frequency such as "every 2 weeks" spreads the recommendation over
    /// that many weeks; anything else is treated as daily feeding.
    pub fn weekly_need_per_rabbit(&self) -> f64 {
        let weeks = self.frequency.as_deref().and_then(interval_weeks);
        match weeks {
            Some(n) if n > 0 => self.daily_recommendation_per_rabbit / (7.0 * f64::from(n)),
            _ => self.daily_recommendation_per_rabbit * 7.0,
        }
    }
}

fn week_interval_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)\b(\d+)\s*weeks?\b").ok())
        .as_ref()
}

/// Number of weeks in a frequency such as "every 3 weeks" or "2 WEEK".
fn interval_weeks(frequency: &str) -> Option<u32> {
    let captures = week_interval_pattern()?.captures(frequency)?;
    captures.get(1)?.as_str().parse().ok()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedLog {
    #[serde(default = "RecordId::generate")]
    pub id: RecordId,
    pub feed_type_id: RecordId,
    pub date: DateTime<Utc>,
    pub quantity_used: f64,
    /// Filled with the Active head count when left empty.
    #[serde(default)]
    pub rabbits_covered: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

impl FeedLog {
    pub fn new(feed_type_id: RecordId, date: DateTime<Utc>, quantity_used: f64) -> Self {
        Self {
            id: RecordId::generate(),
            feed_type_id,
            date,
            quantity_used,
            rabbits_covered: None,
            notes: None,
            created_at: epoch(),
            updated_at: epoch(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    #[serde(default = "RecordId::generate")]
    pub id: RecordId,
    pub rabbit_id: RecordId,
    pub measurement_date: DateTime<Utc>,
    pub weight_kg: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

impl Weight {
    pub fn new(rabbit_id: RecordId, measurement_date: DateTime<Utc>, weight_kg: f64) -> Self {
        Self {
            id: RecordId::generate(),
            rabbit_id,
            measurement_date,
            weight_kg,
            notes: None,
            created_at: epoch(),
            updated_at: epoch(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default = "RecordId::generate")]
    pub id: RecordId,
    pub expense_date: DateTime<Utc>,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "epoch")]
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(expense_date: DateTime<Utc>, category: impl Into<String>, amount: f64) -> Self {
        Self {
            id: RecordId::generate(),
            expense_date,
            category: category.into(),
            amount,
            description: None,
            notes: None,
            created_at: epoch(),
            updated_at: epoch(),
        }
    }
}
