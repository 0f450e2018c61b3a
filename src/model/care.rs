//! Health records and scheduled care tasks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::RecordId;

/// Task categories that count as health care when deciding schedule alerts.
pub const HEALTH_TASK_CATEGORIES: [&str; 4] = ["vaccine", "deworm", "health check", "treatment"];

/// True when the task type names one of the health categories.
pub fn is_health_task(task_type: &str) -> bool {
    let lowered = task_type.to_lowercase();
    HEALTH_TASK_CATEGORIES
        .iter()
        .any(|category| lowered.contains(category))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: RecordId,
    pub rabbit_id: RecordId,
    pub record_date: DateTime<Utc>,
    pub disease_id: Option<RecordId>,
    pub issue: String,
    pub treatment: Option<String>,
    pub medication: Option<String>,
    pub veterinarian: Option<String>,
    pub notes: Option<String>,
    /// Set when an earlier record of the same rabbit matched this issue.
    pub is_repeat: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHealthRecord {
    pub rabbit_id: RecordId,
    pub record_date: DateTime<Utc>,
    pub issue: String,
    #[serde(default)]
    pub disease_id: Option<RecordId>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub medication: Option<String>,
    #[serde(default)]
    pub veterinarian: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewHealthRecord {
    pub fn new(rabbit_id: RecordId, record_date: DateTime<Utc>, issue: impl Into<String>) -> Self {
        Self {
            rabbit_id,
            record_date,
            issue: issue.into(),
            disease_id: None,
            treatment: None,
            medication: None,
            veterinarian: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: RecordId,
    pub task_date: DateTime<Utc>,
    pub task_type: String,
    pub rabbit_id: Option<RecordId>,
    pub litter_id: Option<RecordId>,
    pub notes: Option<String>,
    pub is_completed: bool,
    /// Set for health tasks on rabbits with a repeat health issue.
    pub is_alert: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub task_date: DateTime<Utc>,
    pub task_type: String,
    #[serde(default)]
    pub rabbit_id: Option<RecordId>,
    #[serde(default)]
    pub litter_id: Option<RecordId>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSchedule {
    pub fn new(task_date: DateTime<Utc>, task_type: impl Into<String>) -> Self {
        Self {
            task_date,
            task_type: task_type.into(),
            rabbit_id: None,
            litter_id: None,
            notes: None,
        }
    }

    pub fn for_rabbit(mut self, rabbit_id: RecordId) -> Self {
        self.rabbit_id = Some(rabbit_id);
        self
    }

    pub fn for_litter(mut self, litter_id: RecordId) -> Self {
        self.litter_id = Some(litter_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_task_detection() {
        assert!(is_health_task("Vaccine booster"));
        assert!(is_health_task("monthly DEWORM"));
        assert!(is_health_task("Health Check"));
        assert!(is_health_task("treatment follow-up"));
        assert!(!is_health_task("clean cage"));
        assert!(!is_health_task("weigh kits"));
    }
}
