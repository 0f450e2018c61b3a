//! Terminal events: sale, cull, death
//!
//! Each retires an Active rabbit exactly once. The new status carries the
//! id of the event record, so the rabbit and its terminal event always
//! point at each other.

use crate::model::dates::start_of_day;
use crate::model::{
    Cull, Death, Entity, LifeStatus, NewCull, NewDeath, NewSale, Rabbit, RecordId, Sale,
};
use crate::observability::{log_event_with_fields, Event};
use crate::store::EntityStore;
use crate::validation::Validate;

use super::engine::{LifecycleEngine, OpContext};
use super::errors::{LifecycleError, LifecycleResult, Rule};

impl<S: EntityStore> LifecycleEngine<S> {
    /// Shared cascade: validate the event, require an Active rabbit, then
    /// stage the event and the status change together.
    fn retire<E, B>(
        &self,
        op: &'static str,
        rabbit_id: RecordId,
        status_for: fn(RecordId) -> LifeStatus,
        build: B,
    ) -> LifecycleResult<E>
    where
        E: Entity + Validate,
        B: Fn(&OpContext) -> E,
    {
        let rabbit_str = rabbit_id.to_string();
        let (event, status) = self.run(op, &[("rabbit_id", &rabbit_str)], |tx, ctx| {
            let event = build(ctx);
            event.validate(&ctx.validation())?;

            let mut rabbit = tx.get::<Rabbit>(rabbit_id)?;
            if !rabbit.is_active() {
                return Err(LifecycleError::precondition(
                    Rule::RabbitNotActive,
                    format!("rabbit {} is already {}", rabbit.tag_id, rabbit.status.kind()),
                ));
            }

            let status = status_for(event.id());
            rabbit.status = status;
            rabbit.updated_at = ctx.now;
            tx.update(rabbit)?;
            tx.insert(event.clone())?;
            Ok((event, status))
        })?;

        self.record_retirement();
        log_event_with_fields(
            Event::RabbitRetired,
            &[
                ("event_id", &event.id().to_string()),
                ("rabbit_id", &rabbit_str),
                ("status", status.kind().as_str()),
            ],
        );
        Ok(event)
    }

    /// Sells a rabbit. The price must be greater than zero.
    pub fn create_sale(&self, new: NewSale) -> LifecycleResult<Sale> {
        let id = RecordId::generate();
        self.retire("CREATE_SALE", new.rabbit_id, LifeStatus::Sold, |ctx| Sale {
            id,
            rabbit_id: new.rabbit_id,
            sale_date: start_of_day(new.sale_date),
            sale_price: new.sale_price,
            buyer_name: new.buyer_name.clone(),
            buyer_contact: new.buyer_contact.clone(),
            notes: new.notes.clone(),
            created_at: ctx.now,
            updated_at: ctx.now,
        })
    }

    pub fn create_cull(&self, new: NewCull) -> LifecycleResult<Cull> {
        let id = RecordId::generate();
        self.retire("CREATE_CULL", new.rabbit_id, LifeStatus::Culled, |ctx| Cull {
            id,
            rabbit_id: new.rabbit_id,
            cull_date: start_of_day(new.cull_date),
            reason: new.reason.clone(),
            destination: new.destination.clone(),
            notes: new.notes.clone(),
            created_at: ctx.now,
            updated_at: ctx.now,
        })
    }

    pub fn create_death(&self, new: NewDeath) -> LifecycleResult<Death> {
        let id = RecordId::generate();
        self.retire("CREATE_DEATH", new.rabbit_id, LifeStatus::Deceased, |ctx| Death {
            id,
            rabbit_id: new.rabbit_id,
            death_date: start_of_day(new.death_date),
            cause: new.cause.clone(),
            notes: new.notes.clone(),
            created_at: ctx.now,
            updated_at: ctx.now,
        })
    }
}
