//! Lifecycle Invariant Tests
//!
//! Cross-entity consistency of the engine:
//! - Rabbit status moves Active -> Sold | Culled | Deceased once
//! - Breeding status moves Planned -> Mated | Failed once
//! - Doe pregnancy follows breeding, litter and failure
//! - Rejected operations leave every record unchanged

use std::sync::Arc;

use chrono::{DateTime, Utc};

use rabbitry::lifecycle::{FixedClock, LifecycleEngine, LifecycleError, Rule};
use rabbitry::model::dates::{add_days, ymd};
use rabbitry::model::{
    AcquisitionType, Breed, BreedingStatus, Cage, EntityKind, FeedLog, FeedType, Gender,
    LifeStatus, NewBreeding, NewCull, NewDeath, NewHealthRecord, NewLitter, NewRabbit, NewSale,
    NewSchedule, Rabbit, RecordId, Weight, KIT_DEFAULT_GENDER, MAX_LITTER_SIZE,
};
use rabbitry::store::{EntityStore, MemoryStore};

fn today() -> DateTime<Utc> {
    ymd(2024, 3, 1).unwrap()
}

/// Mating date used by the breeding flows, before the clock's today.
fn bred() -> DateTime<Utc> {
    ymd(2024, 1, 1).unwrap()
}

fn engine() -> LifecycleEngine<MemoryStore> {
    LifecycleEngine::new(Arc::new(MemoryStore::new())).with_clock(FixedClock::new(today()))
}

fn rabbit(
    engine: &LifecycleEngine<MemoryStore>,
    tag: &str,
    gender: Gender,
    age_days: i64,
) -> Rabbit {
    engine
        .create_rabbit(NewRabbit::new(tag, gender).born_on(add_days(today(), -age_days)))
        .unwrap()
}

fn reload(engine: &LifecycleEngine<MemoryStore>, id: RecordId) -> Rabbit {
    engine.store().get::<Rabbit>(id).unwrap()
}

fn assert_rule(err: LifecycleError, rule: Rule) {
    match err {
        LifecycleError::PreconditionFailed { rule: actual, .. } => assert_eq!(actual, rule),
        other => panic!("expected {} precondition, got {:?}", rule, other),
    }
}

// =============================================================================
// Breeding Tests
// =============================================================================

/// Doe 200 days, buck 150 days, bred 2024-01-01: due 2024-01-31.
#[test]
fn test_breeding_sets_due_date_and_pregnancy() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);

    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();

    assert_eq!(breeding.status, BreedingStatus::Planned);
    assert_eq!(breeding.expected_due_date, ymd(2024, 1, 31).unwrap());

    let doe = reload(&engine, doe.id);
    assert!(doe.is_pregnant);
    assert_eq!(doe.last_breeding_date, Some(bred()));
}

/// A rabbit cannot be bred with itself.
#[test]
fn test_breeding_with_self_rejected() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);

    let err = engine
        .create_breeding(NewBreeding::new(doe.id, doe.id, bred()))
        .unwrap_err();
    assert_rule(err, Rule::InvalidBreeding);
    assert!(!reload(&engine, doe.id).is_pregnant);
}

#[test]
fn test_breeding_rejects_immature_pair() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 100);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);

    let err = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap_err();
    assert_rule(err, Rule::InvalidBreeding);
}

#[test]
fn test_breeding_rejects_swapped_genders() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);

    let err = engine
        .create_breeding(NewBreeding::new(doe.id, buck.id, bred()))
        .unwrap_err();
    assert_rule(err, Rule::InvalidBreeding);
}

#[test]
fn test_breeding_rejects_pregnant_doe() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);

    engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();
    let err = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap_err();
    assert_rule(err, Rule::InvalidBreeding);
}

#[test]
fn test_breeding_date_in_future_rejected() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);

    let err = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, add_days(today(), 1)))
        .unwrap_err();
    assert!(matches!(err, LifecycleError::ValidationFailed(_)));
}

#[test]
fn test_breeding_with_missing_rabbit() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);

    let err = engine
        .create_breeding(NewBreeding::new(RecordId::generate(), doe.id, today()))
        .unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::ReferenceNotFound {
            kind: EntityKind::Rabbit,
            ..
        }
    ));
    assert_eq!(err.code(), "RABBITRY_REFERENCE_NOT_FOUND");
}

#[test]
fn test_failed_breeding_reopens_doe() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();

    let failed = engine.mark_breeding_failed(breeding.id).unwrap();
    assert_eq!(failed.status, BreedingStatus::Failed);
    assert!(!reload(&engine, doe.id).is_pregnant);

    // Failed is terminal
    let err = engine.mark_breeding_failed(breeding.id).unwrap_err();
    assert_rule(err, Rule::BreedingNotPlanned);
    let err = engine
        .create_litter(NewLitter::new(breeding.id, add_days(bred(), 30)))
        .unwrap_err();
    assert_rule(err, Rule::BreedingNotPlanned);
}

// =============================================================================
// Litter Tests
// =============================================================================

/// Three kits born with prefix L1 become rabbits L1-1..L1-3.
#[test]
fn test_litter_materializes_kits() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();

    let kindling = ymd(2024, 1, 31).unwrap();
    let litter = engine
        .create_litter(NewLitter::new(breeding.id, kindling).born(3).tagged("L1"))
        .unwrap();

    assert_eq!(litter.kit_ids.len(), 3);
    let breeding = engine
        .store()
        .get::<rabbitry::model::Breeding>(breeding.id)
        .unwrap();
    assert_eq!(breeding.status, BreedingStatus::Mated);
    assert!(!reload(&engine, doe.id).is_pregnant);

    let mut tags: Vec<String> = litter
        .kit_ids
        .iter()
        .map(|id| {
            let kit = reload(&engine, *id);
            assert!(kit.is_active());
            assert_eq!(kit.gender, KIT_DEFAULT_GENDER);
            assert_eq!(kit.acquisition_type, Some(AcquisitionType::Born));
            assert_eq!(kit.sire_id, Some(buck.id));
            assert_eq!(kit.dam_id, Some(doe.id));
            assert_eq!(kit.date_of_birth, Some(kindling));
            assert_eq!(kit.acquisition_date, Some(kindling));
            kit.tag_id
        })
        .collect();
    tags.sort();
    assert_eq!(tags, vec!["L1-1", "L1-2", "L1-3"]);
    assert_eq!(engine.metrics().snapshot().kits_created, 3);
}

/// Any litter size is accepted, including none born.
#[test]
fn test_empty_litter_still_closes_breeding() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();

    let litter = engine
        .create_litter(NewLitter::new(breeding.id, ymd(2024, 1, 31).unwrap()).born(0).tagged("L0"))
        .unwrap();

    assert!(litter.kit_ids.is_empty());
    assert!(!reload(&engine, doe.id).is_pregnant);
}

#[test]
fn test_wean_date_derived_from_weaned_count() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();

    let kindling = ymd(2024, 1, 31).unwrap();
    let litter = engine
        .create_litter(NewLitter::new(breeding.id, kindling).born(5).weaned(4))
        .unwrap();

    assert_eq!(litter.wean_date, Some(ymd(2024, 2, 28).unwrap()));
    assert!(litter.kit_ids.is_empty());
}

#[test]
fn test_second_litter_on_breeding_rejected() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();
    engine
        .create_litter(NewLitter::new(breeding.id, ymd(2024, 1, 31).unwrap()).born(2))
        .unwrap();

    let err = engine
        .create_litter(NewLitter::new(breeding.id, ymd(2024, 2, 1).unwrap()).born(2))
        .unwrap_err();
    assert_rule(err, Rule::BreedingNotPlanned);
}

/// A kit tag clash rejects the whole litter; the breeding stays Planned.
#[test]
fn test_kit_tag_clash_rolls_back_litter() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    rabbit(&engine, "L1-2", Gender::Female, 10);
    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();

    let err = engine
        .create_litter(NewLitter::new(breeding.id, ymd(2024, 1, 31).unwrap()).born(3).tagged("L1"))
        .unwrap_err();
    assert_rule(err, Rule::DuplicateKey);

    let breeding = engine
        .store()
        .get::<rabbitry::model::Breeding>(breeding.id)
        .unwrap();
    assert_eq!(breeding.status, BreedingStatus::Planned);
    assert!(reload(&engine, doe.id).is_pregnant);
    assert_eq!(engine.store().count(EntityKind::Rabbit).unwrap(), 3);
    assert_eq!(engine.store().count(EntityKind::Litter).unwrap(), 0);
}

#[test]
fn test_kindling_before_breeding_rejected() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();

    let err = engine
        .create_litter(NewLitter::new(breeding.id, ymd(2023, 12, 1).unwrap()).born(1))
        .unwrap_err();
    assert!(matches!(err, LifecycleError::ValidationFailed(_)));
}

/// A litter larger than any real kindling is rejected before kits are built.
#[test]
fn test_oversized_litter_rejected() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();

    let err = engine
        .create_litter(
            NewLitter::new(breeding.id, ymd(2024, 1, 31).unwrap())
                .born(MAX_LITTER_SIZE + 1)
                .tagged("L1"),
        )
        .unwrap_err();
    assert_eq!(err.code(), "RABBITRY_VALIDATION_FAILED");
    assert_eq!(engine.store().count(EntityKind::Rabbit).unwrap(), 2);
    assert_eq!(engine.store().count(EntityKind::Litter).unwrap(), 0);
    assert!(reload(&engine, doe.id).is_pregnant);
}

// =============================================================================
// Date Range Tests
// =============================================================================

/// The last representable day has no room for a due date.
#[test]
fn test_breeding_at_end_of_calendar_rejected() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);

    let err = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, DateTime::<Utc>::MAX_UTC))
        .unwrap_err();
    assert!(matches!(err, LifecycleError::ValidationFailed(_)));
    assert_eq!(err.code(), "RABBITRY_VALIDATION_FAILED");
    assert_eq!(engine.store().count(EntityKind::Breeding).unwrap(), 0);
    assert!(!reload(&engine, doe.id).is_pregnant);
    assert_eq!(reload(&engine, doe.id).last_breeding_date, None);
}

#[test]
fn test_far_future_breeding_rejected() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);

    let err = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, ymd(262_000, 12, 31).unwrap()))
        .unwrap_err();
    assert_eq!(err.code(), "RABBITRY_VALIDATION_FAILED");
    assert_eq!(engine.store().count(EntityKind::Breeding).unwrap(), 0);
}

/// Weaning cannot be derived past the last representable day.
#[test]
fn test_kindling_at_end_of_calendar_rejected() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();

    let err = engine
        .create_litter(
            NewLitter::new(breeding.id, DateTime::<Utc>::MAX_UTC)
                .born(3)
                .weaned(2),
        )
        .unwrap_err();
    assert!(matches!(err, LifecycleError::ValidationFailed(_)));
    assert_eq!(err.code(), "RABBITRY_VALIDATION_FAILED");

    let breeding = engine
        .store()
        .get::<rabbitry::model::Breeding>(breeding.id)
        .unwrap();
    assert_eq!(breeding.status, BreedingStatus::Planned);
    assert!(reload(&engine, doe.id).is_pregnant);
    assert_eq!(engine.store().count(EntityKind::Litter).unwrap(), 0);
}

// =============================================================================
// Terminal Event Tests
// =============================================================================

#[test]
fn test_sale_retires_rabbit() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);

    let sale = engine
        .create_sale(NewSale::new(doe.id, today(), 45.0))
        .unwrap();

    let doe = reload(&engine, doe.id);
    assert_eq!(doe.status, LifeStatus::Sold(sale.id));
    assert_eq!(doe.status.terminal_event(), Some(sale.id));
}

/// Cull after sale fails; the rabbit keeps its Sold status.
#[test]
fn test_cull_after_sale_rejected() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let sale = engine
        .create_sale(NewSale::new(doe.id, today(), 45.0))
        .unwrap();

    let err = engine
        .create_cull(NewCull::new(doe.id, today()))
        .unwrap_err();
    assert_rule(err, Rule::RabbitNotActive);
    assert_eq!(reload(&engine, doe.id).status, LifeStatus::Sold(sale.id));
    assert_eq!(engine.store().count(EntityKind::Cull).unwrap(), 0);
}

#[test]
fn test_death_after_cull_rejected() {
    let engine = engine();
    let buck = rabbit(&engine, "B-1", Gender::Male, 400);
    engine.create_cull(NewCull::new(buck.id, today())).unwrap();

    let err = engine
        .create_death(NewDeath::new(buck.id, today()))
        .unwrap_err();
    assert_rule(err, Rule::RabbitNotActive);
}

/// Sale at price 0 fails validation; the rabbit is unchanged.
#[test]
fn test_zero_price_sale_rejected() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);

    let err = engine
        .create_sale(NewSale::new(doe.id, today(), 0.0))
        .unwrap_err();
    assert!(matches!(err, LifecycleError::ValidationFailed(_)));
    assert_eq!(err.code(), "RABBITRY_VALIDATION_FAILED");
    assert_eq!(reload(&engine, doe.id), doe);
    assert_eq!(engine.store().count(EntityKind::Sale).unwrap(), 0);
}

/// An update cannot bring a retired rabbit back.
#[test]
fn test_update_keeps_terminal_status() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let death = engine
        .create_death(NewDeath::new(doe.id, today()))
        .unwrap();

    let mut edited = reload(&engine, doe.id);
    edited.status = LifeStatus::Active;
    edited.name = Some("Clover".to_string());
    let updated = engine.update_rabbit(edited).unwrap();

    assert_eq!(updated.status, LifeStatus::Deceased(death.id));
    assert_eq!(updated.name.as_deref(), Some("Clover"));
}

// =============================================================================
// Rabbit Tests
// =============================================================================

#[test]
fn test_duplicate_tag_rejected() {
    let engine = engine();
    rabbit(&engine, "D-1", Gender::Female, 200);

    let err = engine
        .create_rabbit(NewRabbit::new("D-1", Gender::Male))
        .unwrap_err();
    assert_rule(err, Rule::DuplicateKey);
}

#[test]
fn test_kit_gender_corrected_by_update() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();
    let litter = engine
        .create_litter(NewLitter::new(breeding.id, today()).born(1).tagged("K"))
        .unwrap();

    let mut kit = reload(&engine, litter.kit_ids[0]);
    kit.gender = Gender::Female;
    let kit = engine.update_rabbit(kit).unwrap();
    assert_eq!(kit.gender, Gender::Female);
    assert_eq!(kit.dam_id, Some(doe.id));
}

/// A buck in a planned breeding keeps its gender until the breeding closes.
#[test]
fn test_gender_locked_during_planned_breeding() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    let breeding = engine
        .create_breeding(NewBreeding::new(buck.id, doe.id, bred()))
        .unwrap();

    let mut changed = reload(&engine, buck.id);
    changed.gender = Gender::Female;
    let err = engine.update_rabbit(changed).unwrap_err();
    assert_rule(err, Rule::InvalidBreeding);
    assert_eq!(reload(&engine, buck.id).gender, Gender::Male);

    // Other fields stay editable
    let mut renamed = reload(&engine, buck.id);
    renamed.name = Some("Thumper".into());
    assert_eq!(engine.update_rabbit(renamed).unwrap().name.as_deref(), Some("Thumper"));

    engine.mark_breeding_failed(breeding.id).unwrap();
    let mut changed = reload(&engine, buck.id);
    changed.gender = Gender::Female;
    assert_eq!(engine.update_rabbit(changed).unwrap().gender, Gender::Female);
}

#[test]
fn test_rabbit_with_unknown_cage_rejected() {
    let engine = engine();
    let mut new = NewRabbit::new("D-1", Gender::Female);
    new.cage_id = Some(RecordId::generate());

    let err = engine.create_rabbit(new).unwrap_err();
    assert!(matches!(err, LifecycleError::ReferenceNotFound { kind: EntityKind::Cage, .. }));
}

// =============================================================================
// Health and Schedule Tests
// =============================================================================

/// A first record is never a repeat; a matching second one is.
#[test]
fn test_repeat_issue_detection() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);

    let first = engine
        .create_health_record(NewHealthRecord::new(doe.id, today(), "Ear mites"))
        .unwrap();
    assert!(!first.is_repeat);

    let second = engine
        .create_health_record(NewHealthRecord::new(doe.id, today(), "EAR MITES"))
        .unwrap();
    assert!(second.is_repeat);

    let unrelated = engine
        .create_health_record(NewHealthRecord::new(doe.id, today(), "Sore hocks"))
        .unwrap();
    assert!(!unrelated.is_repeat);

    // Earlier records are never rewritten
    let stored = engine
        .store()
        .get::<rabbitry::model::HealthRecord>(first.id)
        .unwrap();
    assert!(!stored.is_repeat);
}

#[test]
fn test_repeat_detection_is_per_rabbit() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);

    engine
        .create_health_record(NewHealthRecord::new(doe.id, today(), "snuffles"))
        .unwrap();
    let other = engine
        .create_health_record(NewHealthRecord::new(buck.id, today(), "snuffles"))
        .unwrap();
    assert!(!other.is_repeat);
}

#[test]
fn test_health_record_for_retired_rabbit_rejected() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    engine
        .create_sale(NewSale::new(doe.id, today(), 30.0))
        .unwrap();

    let err = engine
        .create_health_record(NewHealthRecord::new(doe.id, today(), "Ear mites"))
        .unwrap_err();
    assert_rule(err, Rule::RabbitNotActive);
}

#[test]
fn test_health_task_alert_for_repeat_patient() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let buck = rabbit(&engine, "B-1", Gender::Male, 150);
    engine
        .create_health_record(NewHealthRecord::new(doe.id, today(), "Ear mites"))
        .unwrap();
    engine
        .create_health_record(NewHealthRecord::new(doe.id, today(), "ear mites"))
        .unwrap();

    let alert = engine
        .create_schedule(NewSchedule::new(today(), "Deworming round").for_rabbit(doe.id))
        .unwrap();
    assert!(alert.is_alert);

    let routine = engine
        .create_schedule(NewSchedule::new(today(), "Clean cage").for_rabbit(doe.id))
        .unwrap();
    assert!(!routine.is_alert);

    let healthy = engine
        .create_schedule(NewSchedule::new(today(), "Vaccine").for_rabbit(buck.id))
        .unwrap();
    assert!(!healthy.is_alert);
}

#[test]
fn test_schedule_completes_once() {
    let engine = engine();
    let task = engine
        .create_schedule(NewSchedule::new(today(), "Clean cages"))
        .unwrap();

    let done = engine.complete_schedule(task.id).unwrap();
    assert!(done.is_completed);

    let err = engine.complete_schedule(task.id).unwrap_err();
    assert_rule(err, Rule::TaskAlreadyCompleted);
}

// =============================================================================
// Catalog Tests
// =============================================================================

#[test]
fn test_catalog_unique_names() {
    let engine = engine();
    engine.create(Breed::new("Rex")).unwrap();

    let err = engine.create(Breed::new("  REX ")).unwrap_err();
    assert_rule(err, Rule::DuplicateKey);

    engine.create(Cage::new("A1", 2)).unwrap();
    let err = engine.create(Cage::new("A1", 4)).unwrap_err();
    assert_rule(err, Rule::DuplicateKey);
}

#[test]
fn test_catalog_update_keeps_created_at() {
    let engine = engine();
    let cage = engine.create(Cage::new("A1", 2)).unwrap();

    let mut edited = cage.clone();
    edited.capacity = 3;
    let updated = engine.update(edited).unwrap();
    assert_eq!(updated.capacity, 3);
    assert_eq!(updated.created_at, cage.created_at);
}

#[test]
fn test_feed_log_counts_active_rabbits() {
    let engine = engine();
    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    rabbit(&engine, "B-1", Gender::Male, 150);
    rabbit(&engine, "B-2", Gender::Male, 150);
    engine
        .create_sale(NewSale::new(doe.id, today(), 30.0))
        .unwrap();
    let pellets = engine.create(FeedType::new("Pellets", "kg", 0.15)).unwrap();

    let log = engine
        .create(FeedLog::new(pellets.id, today(), 10.0))
        .unwrap();
    assert_eq!(log.rabbits_covered, Some(2));

    let mut explicit = FeedLog::new(pellets.id, today(), 5.0);
    explicit.rabbits_covered = Some(7);
    assert_eq!(engine.create(explicit).unwrap().rabbits_covered, Some(7));
}

#[test]
fn test_weight_requires_rabbit() {
    let engine = engine();
    let err = engine
        .create(Weight::new(RecordId::generate(), today(), 3.2))
        .unwrap_err();
    assert!(matches!(err, LifecycleError::ReferenceNotFound { .. }));

    let doe = rabbit(&engine, "D-1", Gender::Female, 200);
    let err = engine.create(Weight::new(doe.id, today(), 0.0)).unwrap_err();
    assert!(matches!(err, LifecycleError::ValidationFailed(_)));
}
