//! Record identity

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a stored record.
///
/// Identifiers are assigned by the engine on insert and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The kinds of record the store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Rabbit,
    Breeding,
    Litter,
    Sale,
    Cull,
    Death,
    HealthRecord,
    Schedule,
    Breed,
    Cage,
    Disease,
    FeedType,
    FeedLog,
    Weight,
    Expense,
}

impl EntityKind {
    /// Every kind, in table order.
    pub const ALL: [EntityKind; 15] = [
        EntityKind::Rabbit,
        EntityKind::Breeding,
        EntityKind::Litter,
        EntityKind::Sale,
        EntityKind::Cull,
        EntityKind::Death,
        EntityKind::HealthRecord,
        EntityKind::Schedule,
        EntityKind::Breed,
        EntityKind::Cage,
        EntityKind::Disease,
        EntityKind::FeedType,
        EntityKind::FeedLog,
        EntityKind::Weight,
        EntityKind::Expense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Rabbit => "rabbit",
            EntityKind::Breeding => "breeding",
            EntityKind::Litter => "litter",
            EntityKind::Sale => "sale",
            EntityKind::Cull => "cull",
            EntityKind::Death => "death",
            EntityKind::HealthRecord => "health_record",
            EntityKind::Schedule => "schedule",
            EntityKind::Breed => "breed",
            EntityKind::Cage => "cage",
            EntityKind::Disease => "disease",
            EntityKind::FeedType => "feed_type",
            EntityKind::FeedLog => "feed_log",
            EntityKind::Weight => "weight",
            EntityKind::Expense => "expense",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
