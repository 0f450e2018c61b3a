//! Acquisition and correction of rabbit records

use crate::model::dates::normalize_opt;
use crate::model::{Breed, Breeding, BreedingStatus, Cage, Entity, NewRabbit, Rabbit, RecordId};
use crate::observability::{log_event_with_fields, Event};
use crate::store::{EntityStore, Transaction};
use crate::validation::{check_parentage, Validate};

use super::engine::{ensure_unique, require_optional_reference, LifecycleEngine, OpContext};
use super::errors::{LifecycleError, LifecycleResult, Rule};

/// Checks shared by acquisition and correction: field rules, unique tag,
/// catalog references, and parent genders.
pub(crate) fn check_rabbit<S: EntityStore>(
    tx: &mut Transaction<'_, S>,
    ctx: &OpContext,
    rabbit: &Rabbit,
) -> LifecycleResult<()> {
    rabbit.validate(&ctx.validation())?;
    ensure_unique::<S, Rabbit, _>(tx, rabbit.id, "tag_id", &rabbit.tag_id, |r| r.tag_id.as_str())?;
    require_optional_reference(tx, Breed::KIND, rabbit.breed_id)?;
    require_optional_reference(tx, Cage::KIND, rabbit.cage_id)?;

    let sire = match rabbit.sire_id {
        Some(id) => Some(tx.get::<Rabbit>(id)?),
        None => None,
    };
    let dam = match rabbit.dam_id {
        Some(id) => Some(tx.get::<Rabbit>(id)?),
        None => None,
    };
    check_parentage(sire.as_ref(), dam.as_ref())?;
    Ok(())
}

/// A rabbit's gender is fixed while it is a parent in a planned breeding.
fn check_gender_change<S: EntityStore>(
    tx: &mut Transaction<'_, S>,
    stored: &Rabbit,
    next: &Rabbit,
) -> LifecycleResult<()> {
    if stored.gender == next.gender {
        return Ok(());
    }
    let open = tx.query::<Breeding, _>(|b| {
        b.status == BreedingStatus::Planned && (b.buck_id == stored.id || b.doe_id == stored.id)
    })?;
    if let Some(breeding) = open.first() {
        return Err(LifecycleError::precondition(
            Rule::InvalidBreeding,
            format!(
                "rabbit {} is a parent in planned breeding {}; its gender cannot change",
                stored.tag_id, breeding.id
            ),
        ));
    }
    Ok(())
}

impl<S: EntityStore> LifecycleEngine<S> {
    /// Registers an acquired rabbit. It starts Active and not pregnant.
    pub fn create_rabbit(&self, new: NewRabbit) -> LifecycleResult<Rabbit> {
        let id = RecordId::generate();
        let id_str = id.to_string();
        let rabbit = self.run("CREATE_RABBIT", &[("rabbit_id", &id_str)], |tx, ctx| {
            let mut new = new.clone();
            new.tag_id = new.tag_id.trim().to_string();
            new.date_of_birth = normalize_opt(new.date_of_birth);
            new.acquisition_date = normalize_opt(new.acquisition_date);

            let rabbit = Rabbit::from_new(id, new, ctx.now);
            check_rabbit(tx, ctx, &rabbit)?;
            tx.insert(rabbit.clone())?;
            Ok(rabbit)
        })?;

        log_event_with_fields(
            Event::RabbitRegistered,
            &[("rabbit_id", &id_str), ("tag_id", &rabbit.tag_id)],
        );
        Ok(rabbit)
    }

    /// Replaces the descriptive fields of a rabbit.
    ///
    /// Status, pregnancy and last breeding date belong to the engine and
    /// are carried over from the stored record, so an update can never
    /// revive a retired animal. Gender is locked while the rabbit is a
    /// parent in a planned breeding.
    pub fn update_rabbit(&self, rabbit: Rabbit) -> LifecycleResult<Rabbit> {
        let id_str = rabbit.id.to_string();
        let updated = self.run("UPDATE_RABBIT", &[("rabbit_id", &id_str)], |tx, ctx| {
            let stored = tx.get::<Rabbit>(rabbit.id)?;

            let mut next = rabbit.clone();
            next.tag_id = next.tag_id.trim().to_string();
            next.date_of_birth = normalize_opt(next.date_of_birth);
            next.acquisition_date = normalize_opt(next.acquisition_date);
            next.status = stored.status;
            next.is_pregnant = stored.is_pregnant;
            next.last_breeding_date = stored.last_breeding_date;
            next.touch(stored.created_at, ctx.now);

            check_gender_change(tx, &stored, &next)?;
            check_rabbit(tx, ctx, &next)?;
            tx.update(next.clone())?;
            Ok(next)
        })?;

        log_event_with_fields(Event::RabbitUpdated, &[("rabbit_id", &id_str)]);
        Ok(updated)
    }
}
