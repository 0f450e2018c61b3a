//! Store error types

use thiserror::Error;

use crate::model::{EntityKind, RecordId};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: RecordId },

    #[error("{kind} {id} already exists")]
    DuplicateId { kind: EntityKind, id: RecordId },

    /// A record or table read by the transaction changed before commit.
    #[error("concurrent write to {kind} invalidated the transaction")]
    Conflict {
        kind: EntityKind,
        id: Option<RecordId>,
    },

    #[error("commit out of order: attempted {attempted}, expected {expected}")]
    OutOfOrder { attempted: u64, expected: u64 },

    #[error("store lock poisoned")]
    Poisoned,

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is corrupt: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "RABBITRY_STORE_NOT_FOUND",
            StoreError::DuplicateId { .. } => "RABBITRY_STORE_DUPLICATE_ID",
            StoreError::Conflict { .. } => "RABBITRY_STORE_CONFLICT",
            StoreError::OutOfOrder { .. } => "RABBITRY_STORE_OUT_OF_ORDER",
            StoreError::Poisoned => "RABBITRY_STORE_POISONED",
            StoreError::Io(_) => "RABBITRY_STORE_IO",
            StoreError::Corrupt(_) => "RABBITRY_STORE_CORRUPT",
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let id = RecordId::generate();
        assert_eq!(
            StoreError::NotFound { kind: EntityKind::Rabbit, id }.code(),
            "RABBITRY_STORE_NOT_FOUND"
        );
        assert_eq!(StoreError::Poisoned.code(), "RABBITRY_STORE_POISONED");
    }

    #[test]
    fn test_not_found_message_names_kind() {
        let id = RecordId::generate();
        let msg = StoreError::NotFound { kind: EntityKind::Breeding, id }.to_string();
        assert!(msg.contains("breeding"));
        assert!(msg.contains(&id.to_string()));
    }

    #[test]
    fn test_conflict_detection() {
        let err = StoreError::Conflict { kind: EntityKind::Rabbit, id: None };
        assert!(err.is_conflict());
        assert!(!StoreError::Poisoned.is_conflict());
    }
}
