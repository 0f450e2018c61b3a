//! Read-only herd summaries
//!
//! Every report scans committed state through [`EntityStore`] and returns
//! plain serializable values. Nothing here writes.
//!
//! [`EntityStore`]: crate::store::EntityStore

mod breeding;
mod feed;
mod finance;
mod population;

pub use breeding::{breeding_success, BreedingSuccess};
pub use feed::{average_weight_by_breed, feed_consumption, BreedWeight, FeedConsumption};
pub use finance::{total_expenses, total_income, CategoryTotal, ExpenseSummary, Period};
pub use population::{population_stats, sick_count, BreedCount, PopulationStats};
