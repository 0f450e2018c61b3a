//! API Handler for rabbitry
//!
//! Decodes a request, hands it to the lifecycle engine or a report, and
//! encodes the result. The handler holds no lock of its own; the engine's
//! commit protocol serializes conflicting writes.

use serde::Serialize;
use serde_json::{json, Value};

use crate::lifecycle::LifecycleEngine;
use crate::model::{Rabbit, StatusKind};
use crate::observability::{log_event_with_fields, Event};
use crate::reporting;
use crate::store::EntityStore;

use super::errors::ApiResult;
use super::request::Request;
use super::response::Response;

/// A handled request and whether it committed a write.
#[derive(Debug, Clone)]
pub struct Processed {
    pub response: Response,
    pub wrote: bool,
}

pub struct ApiHandler<S: EntityStore> {
    engine: LifecycleEngine<S>,
}

impl<S: EntityStore> ApiHandler<S> {
    pub fn new(engine: LifecycleEngine<S>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &LifecycleEngine<S> {
        &self.engine
    }

    /// Handle a raw JSON request string
    pub fn handle(&self, json_request: &str) -> Response {
        self.process(json_request).response
    }

    /// Like [`handle`](Self::handle), also reporting whether state changed.
    pub fn process(&self, json_request: &str) -> Processed {
        let request = match Request::parse(json_request) {
            Ok(r) => r,
            Err(e) => {
                log_event_with_fields(
                    Event::RequestRejected,
                    &[("code", e.code()), ("reason", &e.message())],
                );
                return Processed {
                    response: Response::error(&e),
                    wrote: false,
                };
            }
        };

        let is_write = request.is_write();
        match self.dispatch(request) {
            Ok(data) => Processed {
                response: Response::success(data),
                wrote: is_write,
            },
            Err(e) => Processed {
                response: Response::error(&e),
                wrote: false,
            },
        }
    }

    /// Executes one decoded request.
    pub fn dispatch(&self, request: Request) -> ApiResult<Value> {
        let engine = &self.engine;
        let store = engine.store().as_ref();
        let today = engine.today();

        match request {
            Request::CreateRabbit(new) => encode(engine.create_rabbit(new)?),
            Request::UpdateRabbit(rabbit) => encode(engine.update_rabbit(rabbit)?),
            Request::GetRabbit { id } => encode(store.get::<Rabbit>(id)?),
            Request::ListRabbits { status } => encode(list_rabbits(store, status)?),

            Request::CreateBreeding(new) => encode(engine.create_breeding(new)?),
            Request::MarkBreedingFailed { breeding_id } => {
                encode(engine.mark_breeding_failed(breeding_id)?)
            }
            Request::CreateLitter(new) => encode(engine.create_litter(new)?),

            Request::CreateSale(new) => encode(engine.create_sale(new)?),
            Request::CreateCull(new) => encode(engine.create_cull(new)?),
            Request::CreateDeath(new) => encode(engine.create_death(new)?),

            Request::CreateHealthRecord(new) => encode(engine.create_health_record(new)?),
            Request::CreateSchedule(new) => encode(engine.create_schedule(new)?),
            Request::CompleteSchedule { schedule_id } => {
                encode(engine.complete_schedule(schedule_id)?)
            }

            Request::CreateBreed(r) => encode(engine.create(r)?),
            Request::UpdateBreed(r) => encode(engine.update(r)?),
            Request::CreateCage(r) => encode(engine.create(r)?),
            Request::UpdateCage(r) => encode(engine.update(r)?),
            Request::CreateDisease(r) => encode(engine.create(r)?),
            Request::UpdateDisease(r) => encode(engine.update(r)?),
            Request::CreateFeedType(r) => encode(engine.create(r)?),
            Request::UpdateFeedType(r) => encode(engine.update(r)?),
            Request::CreateFeedLog(r) => encode(engine.create(r)?),
            Request::UpdateFeedLog(r) => encode(engine.update(r)?),
            Request::CreateWeight(r) => encode(engine.create(r)?),
            Request::UpdateWeight(r) => encode(engine.update(r)?),
            Request::CreateExpense(r) => encode(engine.create(r)?),
            Request::UpdateExpense(r) => encode(engine.update(r)?),

            Request::PopulationStats => encode(reporting::population_stats(store, today)?),
            Request::BreedingSuccess => encode(reporting::breeding_success(store)?),
            Request::TotalIncome(period) => {
                let total = reporting::total_income(store, period)?;
                Ok(json!({ "total": total }))
            }
            Request::TotalExpenses(period) => encode(reporting::total_expenses(store, period)?),
            Request::FeedConsumption => encode(reporting::feed_consumption(store, today)?),
            Request::SickCount => {
                let sick = reporting::sick_count(store, today)?;
                Ok(json!({ "sick": sick }))
            }
            Request::AverageWeightByBreed { breed_id } => {
                encode(reporting::average_weight_by_breed(store, breed_id)?)
            }
        }
    }
}

fn list_rabbits<S: EntityStore>(
    store: &S,
    status: Option<StatusKind>,
) -> ApiResult<Vec<Rabbit>> {
    Ok(store.query::<Rabbit, _>(|r| status.map_or(true, |s| r.status.kind() == s))?)
}

fn encode<T: Serialize>(value: T) -> ApiResult<Value> {
    Ok(serde_json::to_value(value)?)
}
