use serde::Serialize;

use crate::model::{Breeding, BreedingStatus};
use crate::store::{EntityStore, StoreResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreedingSuccess {
    pub total_breedings: u64,
    /// Breedings that produced a litter.
    pub successful: u64,
    pub failed: u64,
    /// `successful / total_breedings` as a percentage; 0 with no breedings.
    pub success_rate: f64,
}

pub fn breeding_success<S: EntityStore>(store: &S) -> StoreResult<BreedingSuccess> {
    let breedings = store.query::<Breeding, _>(|_| true)?;
    let with_status =
        |status: BreedingStatus| breedings.iter().filter(|b| b.status == status).count() as u64;

    let total = breedings.len() as u64;
    let successful = with_status(BreedingStatus::Mated);
    let success_rate = if total > 0 {
        successful as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    Ok(BreedingSuccess {
        total_breedings: total,
        successful,
        failed: with_status(BreedingStatus::Failed),
        success_rate,
    })
}
