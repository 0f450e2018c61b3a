//! Time source for the engine
//!
//! Ages, "not in the future" checks and report windows all depend on the
//! current day, so the engine reads it from an injected clock.

use chrono::{DateTime, Utc};

use crate::model::dates::start_of_day;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Start of the current UTC day.
    fn today(&self) -> DateTime<Utc> {
        start_of_day(self.now())
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
