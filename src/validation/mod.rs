//! Field-level validation rules
//!
//! Validation is pure: a rule sees the candidate record, the current day,
//! and any referenced records the caller already fetched. It never touches
//! the store and never mutates what it checks.
//!
//! Rules run before any write is staged. The first violated rule wins.

mod errors;
mod rules;

pub use errors::{ValidationError, ValidationResult};
pub use rules::{check_kindling_date, check_parentage};

use chrono::{DateTime, Utc};

use crate::model::dates::start_of_day;

/// Facts a rule may depend on besides the record itself.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    today: DateTime<Utc>,
}

impl ValidationContext {
    pub fn new(today: DateTime<Utc>) -> Self {
        Self {
            today: start_of_day(today),
        }
    }

    /// Start of the current UTC day.
    pub fn today(&self) -> DateTime<Utc> {
        self.today
    }
}

/// A record kind with field rules.
pub trait Validate {
    fn validate(&self, ctx: &ValidationContext) -> ValidationResult<()>;
}
