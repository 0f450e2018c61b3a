//! Herd record types
//!
//! Plain data: every type here is serializable and free of store access.
//! Lifecycle rules live in `lifecycle`, field rules in `validation`.

mod breeding;
mod care;
mod catalog;
pub mod dates;
mod ids;
mod rabbit;
mod record;
mod terminal;

pub use breeding::{
    Breeding, BreedingStatus, KitCounts, Litter, NewBreeding, NewLitter, MAX_LITTER_SIZE,
};
pub use care::{is_health_task, HealthRecord, NewHealthRecord, NewSchedule, Schedule, HEALTH_TASK_CATEGORIES};
pub use catalog::{Breed, Cage, Disease, Expense, FeedLog, FeedType, Severity, Weight};
pub use ids::{EntityKind, RecordId};
pub use rabbit::{
    AcquisitionType, Gender, LifeStatus, MaturityStatus, NewRabbit, Rabbit, StatusKind,
    KIT_DEFAULT_GENDER,
};
pub use record::{Entity, Record};
pub use terminal::{Cull, Death, NewCull, NewDeath, NewSale, Sale};
