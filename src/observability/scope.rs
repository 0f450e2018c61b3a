//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` or `{name}_FAILED` when closed
//! - Logs `{name}_INCOMPLETE` if dropped while still open

use std::cell::Cell;
use std::time::Instant;

use super::logger::Logger;

/// A scope around one engine operation.
///
/// ```ignore
/// let scope = ObservationScope::with_fields("CREATE_LITTER", &[("breeding_id", &id)]);
/// // ... do work ...
/// scope.complete_with_fields(&[("litter_id", &litter)]);
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
    started: Instant,
}

impl<'a> ObservationScope<'a> {
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Logger::trace(&format!("{}_BEGIN", name), fields);

        Self {
            name,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            started: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> String {
        self.started.elapsed().as_millis().to_string()
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Logs `{name}_COMPLETE` with the opening fields plus `extra_fields`.
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let elapsed = self.elapsed_ms();

        let mut all_fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all_fields.extend(extra_fields.iter().copied());
        all_fields.push(("elapsed_ms", elapsed.as_str()));

        Logger::info(&format!("{}_COMPLETE", self.name), &all_fields);
    }

    /// Logs `{name}_FAILED` at ERROR level with the error code and reason.
    pub fn fail(self, code: &str, reason: &str) {
        self.completed.set(true);

        let mut all_fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all_fields.push(("code", code));
        all_fields.push(("reason", reason));

        Logger::error(&format!("{}_FAILED", self.name), &all_fields);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            let event = format!("{}_INCOMPLETE", self.name);
            Logger::warn(&event, &[("reason", "scope dropped without completion")]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_starts_open() {
        let scope = ObservationScope::new("TEST");
        assert!(!scope.is_completed());
        scope.complete();
    }

    #[test]
    fn test_scope_with_fields_completes() {
        let scope = ObservationScope::with_fields("CREATE_SALE", &[("rabbit_id", "r-1")]);
        scope.complete_with_fields(&[("sale_id", "s-1")]);
    }

    #[test]
    fn test_scope_fail() {
        let scope = ObservationScope::new("CREATE_CULL");
        scope.fail("RABBITRY_PRECONDITION_FAILED", "rabbit already retired");
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new("TEST");
        drop(scope);
    }
}
