//! Validation error type
//!
//! Every violation names the entity kind, the offending field and the
//! rule that failed. Code: RABBITRY_VALIDATION_FAILED (REJECT).

use thiserror::Error;

use crate::model::EntityKind;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// First rule a candidate record violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity}.{field}: {reason}")]
pub struct ValidationError {
    pub entity: EntityKind,
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(entity: EntityKind, field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            entity,
            field,
            reason: reason.into(),
        }
    }

    pub fn blank(entity: EntityKind, field: &'static str) -> Self {
        Self::new(entity, field, "must not be blank")
    }

    pub fn not_positive(entity: EntityKind, field: &'static str, value: f64) -> Self {
        Self::new(entity, field, format!("must be greater than 0, got {}", value))
    }

    pub fn negative(entity: EntityKind, field: &'static str, value: f64) -> Self {
        Self::new(entity, field, format!("must not be negative, got {}", value))
    }

    pub fn in_future(entity: EntityKind, field: &'static str) -> Self {
        Self::new(entity, field, "must not be in the future")
    }

    pub fn out_of_range(entity: EntityKind, field: &'static str) -> Self {
        Self::new(entity, field, "date out of range")
    }

    pub fn code(&self) -> &'static str {
        "RABBITRY_VALIDATION_FAILED"
    }
}
