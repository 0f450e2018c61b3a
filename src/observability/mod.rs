//! Observability subsystem
//!
//! - Structured logging (JSON lines on stderr)
//! - Operational counters
//! - Per-operation begin/complete tracing
//!
//! Observability is read-only: nothing here changes the outcome of an
//! operation, and a failed log write is ignored.
//!
//! ```ignore
//! use rabbitry::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::KitsMaterialized, &[("count", "3")]);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
