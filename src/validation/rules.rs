//! Rules per record kind

use chrono::{DateTime, Utc};

use crate::model::dates::start_of_day;
use crate::model::{
    AcquisitionType, Breed, Breeding, Cage, Cull, Death, Disease, Entity, EntityKind, Expense,
    FeedLog, FeedType, Gender, HealthRecord, Litter, Rabbit, Sale, Schedule, Weight,
    MAX_LITTER_SIZE,
};

use super::errors::{ValidationError, ValidationResult};
use super::{Validate, ValidationContext};

fn require_text(entity: EntityKind, field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::blank(entity, field));
    }
    Ok(())
}

/// Optional text may be absent, but not present and blank.
fn optional_text(
    entity: EntityKind,
    field: &'static str,
    value: Option<&str>,
) -> ValidationResult<()> {
    match value {
        Some(text) => require_text(entity, field, text),
        None => Ok(()),
    }
}

// `!(x > 0)` also rejects NaN.
fn require_positive(entity: EntityKind, field: &'static str, value: f64) -> ValidationResult<()> {
    if !(value > 0.0) {
        return Err(ValidationError::not_positive(entity, field, value));
    }
    Ok(())
}

fn require_non_negative(
    entity: EntityKind,
    field: &'static str,
    value: f64,
) -> ValidationResult<()> {
    if !(value >= 0.0) {
        return Err(ValidationError::negative(entity, field, value));
    }
    Ok(())
}

fn not_in_future(
    entity: EntityKind,
    field: &'static str,
    date: DateTime<Utc>,
    ctx: &ValidationContext,
) -> ValidationResult<()> {
    if start_of_day(date) > ctx.today() {
        return Err(ValidationError::in_future(entity, field));
    }
    Ok(())
}

fn not_before(
    entity: EntityKind,
    field: &'static str,
    date: DateTime<Utc>,
    earliest_field: &'static str,
    earliest: DateTime<Utc>,
) -> ValidationResult<()> {
    if start_of_day(date) < start_of_day(earliest) {
        return Err(ValidationError::new(
            entity,
            field,
            format!("must not be before {}", earliest_field),
        ));
    }
    Ok(())
}

impl Validate for Rabbit {
    fn validate(&self, ctx: &ValidationContext) -> ValidationResult<()> {
        let kind = Rabbit::KIND;
        require_text(kind, "tag_id", &self.tag_id)?;

        if self.sire_id == Some(self.id) {
            return Err(ValidationError::new(kind, "sire_id", "a rabbit cannot be its own sire"));
        }
        if self.dam_id == Some(self.id) {
            return Err(ValidationError::new(kind, "dam_id", "a rabbit cannot be its own dam"));
        }
        if self.sire_id.is_some() && self.sire_id == self.dam_id {
            return Err(ValidationError::new(kind, "dam_id", "sire and dam must differ"));
        }
        if self.acquisition_type == Some(AcquisitionType::Born)
            && (self.sire_id.is_none() || self.dam_id.is_none())
        {
            return Err(ValidationError::new(
                kind,
                "acquisition_type",
                "born rabbits must reference both sire and dam",
            ));
        }
        if self.is_pregnant && self.gender != Gender::Female {
            return Err(ValidationError::new(
                kind,
                "is_pregnant",
                "only female rabbits can be pregnant",
            ));
        }

        if let Some(born) = self.date_of_birth {
            not_in_future(kind, "date_of_birth", born, ctx)?;
            if let Some(acquired) = self.acquisition_date {
                not_before(kind, "acquisition_date", acquired, "date_of_birth", born)?;
            }
        }
        Ok(())
    }
}

/// Parent records referenced by a rabbit must have the matching gender.
///
/// The caller resolves the references; a missing parent is a reference
/// error, not a validation one.
pub fn check_parentage(sire: Option<&Rabbit>, dam: Option<&Rabbit>) -> ValidationResult<()> {
    if let Some(sire) = sire {
        if sire.gender != Gender::Male {
            return Err(ValidationError::new(
                Rabbit::KIND,
                "sire_id",
                format!("sire {} must be male", sire.tag_id),
            ));
        }
    }
    if let Some(dam) = dam {
        if dam.gender != Gender::Female {
            return Err(ValidationError::new(
                Rabbit::KIND,
                "dam_id",
                format!("dam {} must be female", dam.tag_id),
            ));
        }
    }
    Ok(())
}

impl Validate for Breeding {
    fn validate(&self, ctx: &ValidationContext) -> ValidationResult<()> {
        let kind = Breeding::KIND;
        not_in_future(kind, "breeding_date", self.breeding_date, ctx)?;
        not_before(
            kind,
            "expected_due_date",
            self.expected_due_date,
            "breeding_date",
            self.breeding_date,
        )
    }
}

impl Validate for Litter {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        let kind = Litter::KIND;
        let born = self.num_kits_born.unwrap_or(0);
        if born > MAX_LITTER_SIZE {
            return Err(ValidationError::new(
                kind,
                "num_kits_born",
                format!("{} born exceeds the limit of {}", born, MAX_LITTER_SIZE),
            ));
        }
        if let Some(alive) = self.num_kits_alive {
            if alive > born {
                return Err(ValidationError::new(
                    kind,
                    "num_kits_alive",
                    format!("{} alive exceeds {} born", alive, born),
                ));
            }
        }
        if let Some(weaned) = self.num_kits_weaned {
            if weaned > born {
                return Err(ValidationError::new(
                    kind,
                    "num_kits_weaned",
                    format!("{} weaned exceeds {} born", weaned, born),
                ));
            }
        }
        optional_text(kind, "tag_prefix", self.tag_prefix.as_deref())?;
        if let Some(weaned_on) = self.wean_date {
            not_before(kind, "wean_date", weaned_on, "kindling_date", self.kindling_date)?;
        }
        Ok(())
    }
}

/// A litter cannot be kindled before its breeding.
pub fn check_kindling_date(litter: &Litter, breeding: &Breeding) -> ValidationResult<()> {
    not_before(
        Litter::KIND,
        "kindling_date",
        litter.kindling_date,
        "breeding_date",
        breeding.breeding_date,
    )
}

impl Validate for Sale {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        require_positive(Sale::KIND, "sale_price", self.sale_price)?;
        optional_text(Sale::KIND, "buyer_name", self.buyer_name.as_deref())
    }
}

impl Validate for Cull {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        optional_text(Cull::KIND, "reason", self.reason.as_deref())?;
        optional_text(Cull::KIND, "destination", self.destination.as_deref())
    }
}

impl Validate for Death {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        optional_text(Death::KIND, "cause", self.cause.as_deref())
    }
}

impl Validate for HealthRecord {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        require_text(HealthRecord::KIND, "issue", &self.issue)
    }
}

impl Validate for Schedule {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        require_text(Schedule::KIND, "task_type", &self.task_type)
    }
}

impl Validate for Breed {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        require_text(Breed::KIND, "name", &self.name)?;
        if let Some(weight) = self.average_weight_kg {
            require_positive(Breed::KIND, "average_weight_kg", weight)?;
        }
        Ok(())
    }
}

impl Validate for Cage {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        require_text(Cage::KIND, "code", &self.code)?;
        require_positive(Cage::KIND, "capacity", f64::from(self.capacity))
    }
}

impl Validate for Disease {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        require_text(Disease::KIND, "name", &self.name)
    }
}

impl Validate for FeedType {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        let kind = FeedType::KIND;
        require_text(kind, "name", &self.name)?;
        require_text(kind, "unit", &self.unit)?;
        require_non_negative(
            kind,
            "daily_recommendation_per_rabbit",
            self.daily_recommendation_per_rabbit,
        )?;
        if let Some(cost) = self.cost_per_unit {
            require_non_negative(kind, "cost_per_unit", cost)?;
        }
        Ok(())
    }
}

impl Validate for FeedLog {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        require_positive(FeedLog::KIND, "quantity_used", self.quantity_used)
    }
}

impl Validate for Weight {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        require_positive(Weight::KIND, "weight_kg", self.weight_kg)
    }
}

impl Validate for Expense {
    fn validate(&self, _ctx: &ValidationContext) -> ValidationResult<()> {
        require_text(Expense::KIND, "category", &self.category)?;
        require_positive(Expense::KIND, "amount", self.amount)
    }
}
