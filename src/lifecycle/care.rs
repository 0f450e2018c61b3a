//! Health records and scheduled tasks

use crate::model::dates::start_of_day;
use crate::model::{
    is_health_task, Disease, Entity, HealthRecord, Litter, NewHealthRecord, NewSchedule, Rabbit,
    RecordId, Schedule,
};
use crate::observability::{log_event_with_fields, Event};
use crate::store::EntityStore;
use crate::validation::Validate;

use super::engine::{require_optional_reference, LifecycleEngine};
use super::errors::{LifecycleError, LifecycleResult, Rule};

/// True when an earlier issue text contains `issue`, ignoring case.
///
/// Plain substring search over lowercased text: free-form notes match
/// literally at any length.
fn matches_earlier_issue(issue: &str, earlier: &[HealthRecord]) -> bool {
    let needle = issue.trim().to_lowercase();
    earlier
        .iter()
        .any(|record| record.issue.to_lowercase().contains(&needle))
}

impl<S: EntityStore> LifecycleEngine<S> {
    /// Records a health event for an Active rabbit.
    ///
    /// Sets `is_repeat` when an earlier record of the same rabbit mentions
    /// the same issue. Earlier records are left untouched.
    pub fn create_health_record(&self, new: NewHealthRecord) -> LifecycleResult<HealthRecord> {
        let rabbit_str = new.rabbit_id.to_string();
        let record = self.run("CREATE_HEALTH_RECORD", &[("rabbit_id", &rabbit_str)], |tx, ctx| {
            let mut record = HealthRecord {
                id: RecordId::generate(),
                rabbit_id: new.rabbit_id,
                record_date: start_of_day(new.record_date),
                disease_id: new.disease_id,
                issue: new.issue.trim().to_string(),
                treatment: new.treatment.clone(),
                medication: new.medication.clone(),
                veterinarian: new.veterinarian.clone(),
                notes: new.notes.clone(),
                is_repeat: false,
                created_at: ctx.now,
                updated_at: ctx.now,
            };
            record.validate(&ctx.validation())?;

            let rabbit = tx.get::<Rabbit>(record.rabbit_id)?;
            if !rabbit.is_active() {
                return Err(LifecycleError::precondition(
                    Rule::RabbitNotActive,
                    format!(
                        "cannot add a health record for rabbit {}: it is {}",
                        rabbit.tag_id,
                        rabbit.status.kind()
                    ),
                ));
            }
            require_optional_reference(tx, Disease::KIND, record.disease_id)?;

            let earlier = tx.query::<HealthRecord, _>(|h| h.rabbit_id == record.rabbit_id)?;
            record.is_repeat = matches_earlier_issue(&record.issue, &earlier);

            tx.insert(record.clone())?;
            Ok(record)
        })?;

        log_event_with_fields(
            Event::HealthRecorded,
            &[("rabbit_id", &rabbit_str), ("record_id", &record.id.to_string())],
        );
        if record.is_repeat {
            log_event_with_fields(
                Event::RepeatIssueDetected,
                &[("issue", &record.issue), ("rabbit_id", &rabbit_str)],
            );
        }
        Ok(record)
    }

    /// Schedules a task.
    ///
    /// A health task for a rabbit that already has a repeat health issue
    /// is raised as an alert.
    pub fn create_schedule(&self, new: NewSchedule) -> LifecycleResult<Schedule> {
        let schedule = self.run("CREATE_SCHEDULE", &[("task_type", &new.task_type)], |tx, ctx| {
            let mut schedule = Schedule {
                id: RecordId::generate(),
                task_date: start_of_day(new.task_date),
                task_type: new.task_type.trim().to_string(),
                rabbit_id: new.rabbit_id,
                litter_id: new.litter_id,
                notes: new.notes.clone(),
                is_completed: false,
                is_alert: false,
                created_at: ctx.now,
                updated_at: ctx.now,
            };
            schedule.validate(&ctx.validation())?;
            require_optional_reference(tx, Rabbit::KIND, schedule.rabbit_id)?;
            require_optional_reference(tx, Litter::KIND, schedule.litter_id)?;

            if let Some(rabbit_id) = schedule.rabbit_id {
                if is_health_task(&schedule.task_type) {
                    let repeats =
                        tx.query::<HealthRecord, _>(|h| h.rabbit_id == rabbit_id && h.is_repeat)?;
                    schedule.is_alert = !repeats.is_empty();
                }
            }

            tx.insert(schedule.clone())?;
            Ok(schedule)
        })?;

        let id_str = schedule.id.to_string();
        log_event_with_fields(Event::ScheduleCreated, &[("schedule_id", &id_str)]);
        if schedule.is_alert {
            log_event_with_fields(
                Event::ScheduleAlertRaised,
                &[("schedule_id", &id_str), ("task_type", &schedule.task_type)],
            );
        }
        Ok(schedule)
    }

    /// Marks a task done. Completing it twice is rejected.
    pub fn complete_schedule(&self, schedule_id: RecordId) -> LifecycleResult<Schedule> {
        let id_str = schedule_id.to_string();
        let schedule = self.run("COMPLETE_SCHEDULE", &[("schedule_id", &id_str)], |tx, ctx| {
            let mut schedule = tx.get::<Schedule>(schedule_id)?;
            if schedule.is_completed {
                return Err(LifecycleError::precondition(
                    Rule::TaskAlreadyCompleted,
                    format!("schedule {} is already completed", schedule_id),
                ));
            }
            schedule.is_completed = true;
            schedule.updated_at = ctx.now;
            tx.update(schedule.clone())?;
            Ok(schedule)
        })?;

        log_event_with_fields(Event::ScheduleCompleted, &[("schedule_id", &id_str)]);
        Ok(schedule)
    }
}
