//! Engine core: unit-of-work runner and shared checks
//!
//! Every public operation is one call to [`LifecycleEngine::run`]. The
//! body stages the triggering write and all of its cascades on a fresh
//! [`Transaction`]; `run` commits them together. When the commit loses a
//! race the whole body runs again against the latest state, preconditions
//! included, until `max_commit_attempts` is reached.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::model::{Entity, EntityKind, RecordId};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, ObservationScope};
use crate::store::{EntityStore, Transaction};
use crate::validation::ValidationContext;

use super::clock::{Clock, SystemClock};
use super::config::EngineConfig;
use super::errors::{LifecycleError, LifecycleResult, Rule};

/// Time facts fixed for one attempt of one operation.
#[derive(Debug, Clone, Copy)]
pub struct OpContext {
    pub now: DateTime<Utc>,
    pub today: DateTime<Utc>,
}

impl OpContext {
    pub fn validation(&self) -> ValidationContext {
        ValidationContext::new(self.today)
    }
}

/// The cross-entity consistency engine.
///
/// Holds its store by handle and reads through it on every call; nothing
/// is cached between operations.
pub struct LifecycleEngine<S: EntityStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    metrics: Arc<MetricsRegistry>,
}

impl<S: EntityStore> LifecycleEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            config: EngineConfig::default(),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Start of the current UTC day according to the engine's clock.
    pub fn today(&self) -> DateTime<Utc> {
        self.clock.today()
    }

    /// Runs `body` as one unit of work, retrying on commit conflicts.
    pub(crate) fn run<T, F>(
        &self,
        op: &'static str,
        fields: &[(&'static str, &str)],
        mut body: F,
    ) -> LifecycleResult<T>
    where
        F: FnMut(&mut Transaction<'_, S>, &OpContext) -> LifecycleResult<T>,
    {
        let scope = ObservationScope::with_fields(op, fields);
        let max_attempts = self.config.max_commit_attempts.max(1);
        let mut attempt = 0;

        let result = loop {
            attempt += 1;
            let now = self.clock.now();
            let ctx = OpContext {
                now,
                today: self.clock.today(),
            };

            // Dropping `tx` on the error path discards the staged writes
            let mut tx = Transaction::begin(self.store.as_ref());
            let outcome = match body(&mut tx, &ctx) {
                Ok(value) => tx.commit().map(|_| value).map_err(LifecycleError::from),
                Err(e) => Err(e),
            };

            match outcome {
                Err(e) if e.is_conflict() => {
                    self.metrics.increment_conflicts();
                    let attempt_str = attempt.to_string();
                    if attempt < max_attempts {
                        log_event_with_fields(
                            Event::CommitConflict,
                            &[("op", op), ("attempt", &attempt_str)],
                        );
                        continue;
                    }
                    log_event_with_fields(
                        Event::CommitRetriesExhausted,
                        &[("op", op), ("attempts", &attempt_str)],
                    );
                    break Err(e.with_attempts(attempt));
                }
                other => break other,
            }
        };

        match &result {
            Ok(_) => {
                self.metrics.increment_committed();
                scope.complete_with_fields(&[("attempts", &attempt.to_string())]);
            }
            Err(e) => {
                self.metrics.increment_rejected();
                if !matches!(e, LifecycleError::Storage(_) | LifecycleError::ConcurrencyConflict { .. }) {
                    let rule = e.rule().unwrap_or_default();
                    log_event_with_fields(
                        Event::WriteRejected,
                        &[("op", op), ("code", e.code()), ("rule", &rule)],
                    );
                }
                scope.fail(e.code(), &e.to_string());
            }
        }
        result
    }

    pub(crate) fn record_retirement(&self) {
        self.metrics.increment_retired();
    }

    pub(crate) fn record_kits(&self, kits: usize) {
        self.metrics.add_kits(kits as u64);
    }
}

/// Fails with `ReferenceNotFound` unless the referenced record exists.
pub(crate) fn require_reference<S: EntityStore>(
    tx: &mut Transaction<'_, S>,
    kind: EntityKind,
    id: RecordId,
) -> LifecycleResult<()> {
    if !tx.contains(kind, id)? {
        return Err(LifecycleError::ReferenceNotFound { kind, id });
    }
    Ok(())
}

pub(crate) fn require_optional_reference<S: EntityStore>(
    tx: &mut Transaction<'_, S>,
    kind: EntityKind,
    id: Option<RecordId>,
) -> LifecycleResult<()> {
    match id {
        Some(id) => require_reference(tx, kind, id),
        None => Ok(()),
    }
}

/// Fails with `DuplicateKey` when another record of `T` already uses
/// `value` as its unique key.
pub(crate) fn ensure_unique<S, T, F>(
    tx: &mut Transaction<'_, S>,
    exclude: RecordId,
    field: &'static str,
    value: &str,
    key: F,
) -> LifecycleResult<()>
where
    S: EntityStore,
    T: Entity,
    F: Fn(&T) -> &str,
{
    let taken = tx.query::<T, _>(|other| other.id() != exclude && key(other) == value)?;
    if !taken.is_empty() {
        return Err(LifecycleError::precondition(
            Rule::DuplicateKey,
            format!("{} {} '{}' is already taken", T::KIND, field, value),
        ));
    }
    Ok(())
}
