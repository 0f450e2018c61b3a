//! Breeding, kindling and the pregnancy flag
//!
//! Cascades:
//! - breeding created: doe pregnant, last breeding date set
//! - breeding failed: doe no longer pregnant
//! - litter created: breeding `Mated`, doe no longer pregnant, one Active
//!   rabbit per kit born when a tag prefix is given

use chrono::{DateTime, Utc};

use crate::model::dates::{
    checked_add_days, normalize_opt, start_of_day, GESTATION_DAYS, WEANING_DAYS,
};
use crate::model::{
    AcquisitionType, Breeding, BreedingStatus, Entity, Gender, Litter, NewBreeding, NewLitter,
    NewRabbit, Rabbit, RecordId, KIT_DEFAULT_GENDER,
};
use crate::observability::{log_event_with_fields, Event};
use crate::store::{EntityStore, Transaction};
use crate::validation::{check_kindling_date, check_parentage, Validate, ValidationError};

use super::engine::{LifecycleEngine, OpContext};
use super::errors::{LifecycleError, LifecycleResult, Rule};

fn invalid_breeding(detail: impl Into<String>) -> LifecycleError {
    LifecycleError::precondition(Rule::InvalidBreeding, detail)
}

/// Pairing rules checked against the current state of both animals.
fn check_pair(buck: &Rabbit, doe: &Rabbit, today: DateTime<Utc>) -> LifecycleResult<()> {
    if buck.gender != Gender::Male {
        return Err(invalid_breeding(format!("buck {} must be male", buck.tag_id)));
    }
    if doe.gender != Gender::Female {
        return Err(invalid_breeding(format!("doe {} must be female", doe.tag_id)));
    }
    if !buck.is_active() {
        return Err(invalid_breeding(format!(
            "buck {} is {}",
            buck.tag_id,
            buck.status.kind()
        )));
    }
    if !doe.is_active() {
        return Err(invalid_breeding(format!("doe {} is {}", doe.tag_id, doe.status.kind())));
    }
    if !buck.is_mature(today) {
        return Err(invalid_breeding(format!(
            "buck {} is {} days old, breeding needs at least 112",
            buck.tag_id,
            buck.age_in_days(today)
        )));
    }
    if !doe.is_mature(today) {
        return Err(invalid_breeding(format!(
            "doe {} is {} days old, breeding needs at least 112",
            doe.tag_id,
            doe.age_in_days(today)
        )));
    }
    if doe.is_pregnant {
        return Err(invalid_breeding(format!("doe {} is already pregnant", doe.tag_id)));
    }
    Ok(())
}

fn open_breeding<S: EntityStore>(
    tx: &mut Transaction<'_, S>,
    id: RecordId,
) -> LifecycleResult<Breeding> {
    let breeding = tx.get::<Breeding>(id)?;
    if breeding.status != BreedingStatus::Planned {
        return Err(LifecycleError::precondition(
            Rule::BreedingNotPlanned,
            format!("breeding {} is already {}", id, breeding.status.as_str()),
        ));
    }
    Ok(breeding)
}

fn clear_pregnancy<S: EntityStore>(
    tx: &mut Transaction<'_, S>,
    ctx: &OpContext,
    doe_id: RecordId,
) -> LifecycleResult<()> {
    let mut doe = tx.get::<Rabbit>(doe_id)?;
    if doe.is_pregnant {
        doe.is_pregnant = false;
        doe.updated_at = ctx.now;
        tx.update(doe)?;
    }
    Ok(())
}

/// Builds and stages one rabbit per kit, tagged `{prefix}-{n}`.
fn materialize_kits<S: EntityStore>(
    tx: &mut Transaction<'_, S>,
    ctx: &OpContext,
    breeding: &Breeding,
    litter: &Litter,
    prefix: &str,
    count: u32,
) -> LifecycleResult<Vec<RecordId>> {
    let buck = tx.get::<Rabbit>(breeding.buck_id)?;
    let doe = tx.get::<Rabbit>(breeding.doe_id)?;
    check_parentage(Some(&buck), Some(&doe))?;

    let tags: Vec<String> = (1..=count).map(|n| format!("{}-{}", prefix, n)).collect();
    let clashes = tx.query::<Rabbit, _>(|r| tags.contains(&r.tag_id))?;
    if let Some(clash) = clashes.first() {
        return Err(LifecycleError::precondition(
            Rule::DuplicateKey,
            format!("rabbit tag_id '{}' is already taken", clash.tag_id),
        ));
    }

    let validation = ctx.validation();
    let mut kit_ids = Vec::with_capacity(tags.len());
    for tag in tags {
        let mut new = NewRabbit::new(tag, KIT_DEFAULT_GENDER)
            .born_on(litter.kindling_date)
            .acquired(AcquisitionType::Born)
            .with_parents(breeding.buck_id, breeding.doe_id);
        new.acquisition_date = Some(litter.kindling_date);

        let kit = Rabbit::from_new(RecordId::generate(), new, ctx.now);
        kit.validate(&validation)?;
        kit_ids.push(tx.insert(kit)?);
    }
    Ok(kit_ids)
}

impl<S: EntityStore> LifecycleEngine<S> {
    /// Records a mating. The doe becomes pregnant and the litter is due
    /// 30 days after the breeding date.
    pub fn create_breeding(&self, new: NewBreeding) -> LifecycleResult<Breeding> {
        let buck_str = new.buck_id.to_string();
        let doe_str = new.doe_id.to_string();
        let fields = [("buck_id", buck_str.as_str()), ("doe_id", doe_str.as_str())];

        let breeding = self.run("CREATE_BREEDING", &fields, |tx, ctx| {
            let breeding_date = start_of_day(new.breeding_date);
            let expected_due_date = checked_add_days(breeding_date, GESTATION_DAYS)
                .ok_or_else(|| ValidationError::out_of_range(Breeding::KIND, "breeding_date"))?;
            let breeding = Breeding {
                id: RecordId::generate(),
                buck_id: new.buck_id,
                doe_id: new.doe_id,
                breeding_date,
                expected_due_date,
                notes: new.notes.clone(),
                status: BreedingStatus::Planned,
                created_at: ctx.now,
                updated_at: ctx.now,
            };
            breeding.validate(&ctx.validation())?;

            if breeding.buck_id == breeding.doe_id {
                return Err(invalid_breeding("buck and doe are the same rabbit"));
            }
            let buck = tx.get::<Rabbit>(breeding.buck_id)?;
            let mut doe = tx.get::<Rabbit>(breeding.doe_id)?;
            check_pair(&buck, &doe, ctx.today)?;

            doe.is_pregnant = true;
            doe.last_breeding_date = Some(breeding_date);
            doe.updated_at = ctx.now;
            tx.update(doe)?;
            tx.insert(breeding.clone())?;
            Ok(breeding)
        })?;

        log_event_with_fields(
            Event::BreedingRecorded,
            &[
                ("breeding_id", &breeding.id.to_string()),
                ("doe_id", &doe_str),
                ("expected_due_date", &breeding.expected_due_date.date_naive().to_string()),
            ],
        );
        Ok(breeding)
    }

    /// Closes a planned breeding without a litter; the doe is open again.
    pub fn mark_breeding_failed(&self, breeding_id: RecordId) -> LifecycleResult<Breeding> {
        let id_str = breeding_id.to_string();
        let breeding = self.run("MARK_BREEDING_FAILED", &[("breeding_id", &id_str)], |tx, ctx| {
            let mut breeding = open_breeding(tx, breeding_id)?;
            breeding.status = BreedingStatus::Failed;
            breeding.updated_at = ctx.now;
            clear_pregnancy(tx, ctx, breeding.doe_id)?;
            tx.update(breeding.clone())?;
            Ok(breeding)
        })?;

        log_event_with_fields(Event::BreedingFailed, &[("breeding_id", &id_str)]);
        Ok(breeding)
    }

    /// Records a kindling on a planned breeding.
    ///
    /// Any litter size is accepted, including none born. Kits become
    /// rabbits only when a tag prefix is supplied.
    pub fn create_litter(&self, new: NewLitter) -> LifecycleResult<Litter> {
        let breeding_str = new.breeding_id.to_string();
        let litter = self.run("CREATE_LITTER", &[("breeding_id", &breeding_str)], |tx, ctx| {
            let mut breeding = open_breeding(tx, new.breeding_id)?;

            let kindling_date = start_of_day(new.kindling_date);
            let weaned = new.counts.weaned.unwrap_or(0);
            let wean_date = match normalize_opt(new.wean_date) {
                Some(date) => Some(date),
                None if weaned > 0 => Some(
                    checked_add_days(kindling_date, WEANING_DAYS)
                        .ok_or_else(|| ValidationError::out_of_range(Litter::KIND, "kindling_date"))?,
                ),
                None => None,
            };
            let tag_prefix = new.tag_prefix.as_ref().map(|p| p.trim().to_string());

            let mut litter = Litter {
                id: RecordId::generate(),
                breeding_id: breeding.id,
                kindling_date,
                num_kits_born: new.counts.born,
                num_kits_alive: new.counts.alive,
                num_kits_weaned: new.counts.weaned,
                wean_date,
                tag_prefix,
                kit_ids: Vec::new(),
                notes: new.notes.clone(),
                created_at: ctx.now,
                updated_at: ctx.now,
            };
            litter.validate(&ctx.validation())?;
            check_kindling_date(&litter, &breeding)?;

            breeding.status = BreedingStatus::Mated;
            breeding.updated_at = ctx.now;
            clear_pregnancy(tx, ctx, breeding.doe_id)?;

            let born = litter.num_kits_born.unwrap_or(0);
            if let Some(prefix) = litter.tag_prefix.clone() {
                if born > 0 {
                    litter.kit_ids = materialize_kits(tx, ctx, &breeding, &litter, &prefix, born)?;
                }
            }

            tx.update(breeding)?;
            tx.insert(litter.clone())?;
            Ok(litter)
        })?;

        let litter_str = litter.id.to_string();
        log_event_with_fields(
            Event::LitterRecorded,
            &[("breeding_id", &breeding_str), ("litter_id", &litter_str)],
        );
        if !litter.kit_ids.is_empty() {
            self.record_kits(litter.kit_ids.len());
            log_event_with_fields(
                Event::KitsMaterialized,
                &[("count", &litter.kit_ids.len().to_string()), ("litter_id", &litter_str)],
            );
        }
        Ok(litter)
    }
}
