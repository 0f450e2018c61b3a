//! Lifecycle transition engine
//!
//! One orchestration function per operation. Each stages its triggering
//! write and every cascade it implies in a single transaction:
//!
//! | Operation | Cascade |
//! |---|---|
//! | `create_breeding` | doe pregnant, last breeding date |
//! | `mark_breeding_failed` | breeding `Failed`, doe open |
//! | `create_litter` | breeding `Mated`, doe open, kits born |
//! | `create_sale` / `create_cull` / `create_death` | rabbit retired |
//! | `create_health_record` | repeat flag on the new record |
//! | `create_schedule` | alert flag on the new task |
//!
//! Rabbit status moves `Active -> Sold | Culled | Deceased` once and never
//! back. Breeding status moves `Planned -> Mated | Failed` once.

mod breeding;
mod care;
mod catalog;
mod clock;
mod config;
mod engine;
mod errors;
mod rabbits;
mod retirement;

pub use catalog::CatalogEntity;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{LifecycleEngine, OpContext};
pub use errors::{LifecycleError, LifecycleResult, Rule};
