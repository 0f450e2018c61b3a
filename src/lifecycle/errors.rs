//! Lifecycle engine errors
//!
//! Error codes:
//! - RABBITRY_VALIDATION_FAILED (REJECT)
//! - RABBITRY_REFERENCE_NOT_FOUND (REJECT)
//! - RABBITRY_PRECONDITION_FAILED (REJECT)
//! - RABBITRY_CONCURRENCY_CONFLICT (RETRYABLE)
//! - RABBITRY_STORAGE (ERROR)

use std::fmt;

use thiserror::Error;

use crate::model::{EntityKind, RecordId};
use crate::store::StoreError;
use crate::validation::ValidationError;

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Lifecycle rule a precondition failure violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Buck/doe pairing is not allowed.
    InvalidBreeding,
    /// The rabbit already carries a terminal status.
    RabbitNotActive,
    /// The breeding already left `Planned`.
    BreedingNotPlanned,
    /// A unique key is already taken.
    DuplicateKey,
    TaskAlreadyCompleted,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::InvalidBreeding => "InvalidBreeding",
            Rule::RabbitNotActive => "RabbitNotActive",
            Rule::BreedingNotPlanned => "BreedingNotPlanned",
            Rule::DuplicateKey => "DuplicateKey",
            Rule::TaskAlreadyCompleted => "TaskAlreadyCompleted",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("{kind} {id} not found")]
    ReferenceNotFound { kind: EntityKind, id: RecordId },

    #[error("{rule}: {detail}")]
    PreconditionFailed { rule: Rule, detail: String },

    /// Every attempt lost a race with another writer.
    #[error("concurrent writes to {kind} after {attempts} attempt(s)")]
    ConcurrencyConflict { kind: EntityKind, attempts: u32 },

    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl LifecycleError {
    pub fn precondition(rule: Rule, detail: impl Into<String>) -> Self {
        LifecycleError::PreconditionFailed {
            rule,
            detail: detail.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            LifecycleError::ValidationFailed(_) => "RABBITRY_VALIDATION_FAILED",
            LifecycleError::ReferenceNotFound { .. } => "RABBITRY_REFERENCE_NOT_FOUND",
            LifecycleError::PreconditionFailed { .. } => "RABBITRY_PRECONDITION_FAILED",
            LifecycleError::ConcurrencyConflict { .. } => "RABBITRY_CONCURRENCY_CONFLICT",
            LifecycleError::Storage(_) => "RABBITRY_STORAGE",
        }
    }

    /// Kind name as exposed to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleError::ValidationFailed(_) => "ValidationFailed",
            LifecycleError::ReferenceNotFound { .. } => "ReferenceNotFound",
            LifecycleError::PreconditionFailed { .. } => "PreconditionFailed",
            LifecycleError::ConcurrencyConflict { .. } => "ConcurrencyConflict",
            LifecycleError::Storage(_) => "Storage",
        }
    }

    /// The violated rule, for errors that have one.
    pub fn rule(&self) -> Option<String> {
        match self {
            LifecycleError::ValidationFailed(e) => Some(format!("{}.{}", e.entity, e.field)),
            LifecycleError::PreconditionFailed { rule, .. } => Some(rule.to_string()),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, LifecycleError::ConcurrencyConflict { .. })
    }

    pub(crate) fn with_attempts(self, attempts: u32) -> Self {
        match self {
            LifecycleError::ConcurrencyConflict { kind, .. } => {
                LifecycleError::ConcurrencyConflict { kind, attempts }
            }
            other => other,
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { kind, id } => LifecycleError::ReferenceNotFound { kind, id },
            StoreError::DuplicateId { kind, id } => LifecycleError::precondition(
                Rule::DuplicateKey,
                format!("{} {} already exists", kind, id),
            ),
            StoreError::Conflict { kind, .. } => {
                LifecycleError::ConcurrencyConflict { kind, attempts: 1 }
            }
            other => LifecycleError::Storage(other),
        }
    }
}
