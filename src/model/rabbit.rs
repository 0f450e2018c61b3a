//! Rabbit records and their lifecycle state

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates::{days_between, ADULT_MAX_DAYS, KIT_MAX_DAYS, MATURITY_DAYS};
use super::ids::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gender given to kits materialized from a litter count.
///
/// A birth count carries no sex information; every kit starts with this
/// value and is expected to be corrected through `update_rabbit`.
pub const KIT_DEFAULT_GENDER: Gender = Gender::Male;

/// How a rabbit entered the herd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionType {
    Born,
    Purchased,
    Gift,
    Other,
}

/// Lifecycle state of a rabbit.
///
/// `Active` is the only state with outgoing transitions. Each terminal
/// variant carries the id of the Sale, Cull or Death record that retired
/// the animal, so a rabbit can hold at most one terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "event")]
pub enum LifeStatus {
    Active,
    Sold(RecordId),
    Culled(RecordId),
    Deceased(RecordId),
}

impl LifeStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            LifeStatus::Active => StatusKind::Active,
            LifeStatus::Sold(_) => StatusKind::Sold,
            LifeStatus::Culled(_) => StatusKind::Culled,
            LifeStatus::Deceased(_) => StatusKind::Deceased,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, LifeStatus::Active)
    }

    /// The terminal event that retired the animal, if any.
    pub fn terminal_event(&self) -> Option<RecordId> {
        match self {
            LifeStatus::Active => None,
            LifeStatus::Sold(id) | LifeStatus::Culled(id) | LifeStatus::Deceased(id) => Some(*id),
        }
    }
}

/// Payload-free view of [`LifeStatus`], used for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Active,
    Sold,
    Deceased,
    Culled,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Active => "Active",
            StatusKind::Sold => "Sold",
            StatusKind::Deceased => "Deceased",
            StatusKind::Culled => "Culled",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Age band derived from date of birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaturityStatus {
    Kit,
    Junior,
    Adult,
    Senior,
}

/// A rabbit as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rabbit {
    pub id: RecordId,
    pub tag_id: String,
    pub name: Option<String>,
    pub breed_id: Option<RecordId>,
    pub gender: Gender,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub acquisition_date: Option<DateTime<Utc>>,
    pub acquisition_type: Option<AcquisitionType>,
    pub source_farm: Option<String>,
    pub cage_id: Option<RecordId>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub sire_id: Option<RecordId>,
    pub dam_id: Option<RecordId>,
    pub status: LifeStatus,
    pub is_pregnant: bool,
    pub last_breeding_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rabbit {
    /// Builds an Active, non-pregnant rabbit from an acquisition request.
    pub fn from_new(id: RecordId, new: NewRabbit, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tag_id: new.tag_id,
            name: new.name,
            breed_id: new.breed_id,
            gender: new.gender,
            date_of_birth: new.date_of_birth,
            acquisition_date: new.acquisition_date,
            acquisition_type: new.acquisition_type,
            source_farm: new.source_farm,
            cage_id: new.cage_id,
            color: new.color,
            category: new.category,
            notes: new.notes,
            sire_id: new.sire_id,
            dam_id: new.dam_id,
            status: LifeStatus::Active,
            is_pregnant: false,
            last_breeding_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LifeStatus::Active
    }

    /// Age in whole days at `today`; zero when the birth date is unknown.
    pub fn age_in_days(&self, today: DateTime<Utc>) -> i64 {
        self.date_of_birth
            .map(|born| days_between(born, today).max(0))
            .unwrap_or(0)
    }

    pub fn maturity_status(&self, today: DateTime<Utc>) -> MaturityStatus {
        let age = self.age_in_days(today);
        if age <= KIT_MAX_DAYS {
            MaturityStatus::Kit
        } else if age <= MATURITY_DAYS {
            MaturityStatus::Junior
        } else if age <= ADULT_MAX_DAYS {
            MaturityStatus::Adult
        } else {
            MaturityStatus::Senior
        }
    }

    /// Old enough to breed.
    pub fn is_mature(&self, today: DateTime<Utc>) -> bool {
        self.age_in_days(today) >= MATURITY_DAYS
    }

    /// Name when set, tag otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.tag_id)
    }
}

/// Acquisition request for a rabbit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRabbit {
    pub tag_id: String,
    pub gender: Gender,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub breed_id: Option<RecordId>,
    #[serde(default)]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[serde(default)]
    pub acquisition_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub acquisition_type: Option<AcquisitionType>,
    #[serde(default)]
    pub source_farm: Option<String>,
    #[serde(default)]
    pub cage_id: Option<RecordId>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub sire_id: Option<RecordId>,
    #[serde(default)]
    pub dam_id: Option<RecordId>,
}

impl NewRabbit {
    pub fn new(tag_id: impl Into<String>, gender: Gender) -> Self {
        Self {
            tag_id: tag_id.into(),
            gender,
            name: None,
            breed_id: None,
            date_of_birth: None,
            acquisition_date: None,
            acquisition_type: None,
            source_farm: None,
            cage_id: None,
            color: None,
            category: None,
            notes: None,
            sire_id: None,
            dam_id: None,
        }
    }

    pub fn born_on(mut self, date: DateTime<Utc>) -> Self {
        self.date_of_birth = Some(date);
        self
    }

    pub fn acquired(mut self, how: AcquisitionType) -> Self {
        self.acquisition_type = Some(how);
        self
    }

    pub fn with_parents(mut self, sire: RecordId, dam: RecordId) -> Self {
        self.sire_id = Some(sire);
        self.dam_id = Some(dam);
        self
    }
}
