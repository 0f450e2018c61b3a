//! Uniform record envelope for storage
//!
//! The store keeps every kind in one keyed space of [`Record`] values. The
//! [`Entity`] trait gives typed access to the variant of each kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::breeding::{Breeding, Litter};
use super::care::{HealthRecord, Schedule};
use super::catalog::{Breed, Cage, Disease, Expense, FeedLog, FeedType, Weight};
use super::ids::{EntityKind, RecordId};
use super::rabbit::Rabbit;
use super::terminal::{Cull, Death, Sale};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record")]
pub enum Record {
    Rabbit(Rabbit),
    Breeding(Breeding),
    Litter(Litter),
    Sale(Sale),
    Cull(Cull),
    Death(Death),
    HealthRecord(HealthRecord),
    Schedule(Schedule),
    Breed(Breed),
    Cage(Cage),
    Disease(Disease),
    FeedType(FeedType),
    FeedLog(FeedLog),
    Weight(Weight),
    Expense(Expense),
}

/// A typed record kind the store can hold.
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> RecordId;

    /// `(created_at, updated_at)`
    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>);

    /// Stamps engine-owned timestamps.
    fn touch(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);

    fn into_record(self) -> Record;

    fn from_record(record: &Record) -> Option<&Self>;
}

macro_rules! impl_entity {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl Entity for $ty {
                const KIND: EntityKind = EntityKind::$ty;

                fn id(&self) -> RecordId {
                    self.id
                }

                fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>) {
                    (self.created_at, self.updated_at)
                }

                fn touch(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
                    self.created_at = created_at;
                    self.updated_at = updated_at;
                }

                fn into_record(self) -> Record {
                    Record::$ty(self)
                }

                fn from_record(record: &Record) -> Option<&Self> {
                    match record {
                        Record::$ty(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )+

        impl Record {
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(Record::$ty(_) => EntityKind::$ty,)+
                }
            }

            pub fn id(&self) -> RecordId {
                match self {
                    $(Record::$ty(inner) => inner.id,)+
                }
            }
        }
    };
}

impl_entity!(
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
);
