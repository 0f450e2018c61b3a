//! Named lifecycle events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Process
    BootStart,
    BootComplete,
    ConfigLoaded,
    Serving,
    ShutdownComplete,

    // Persistence
    SnapshotLoaded,
    SnapshotSaved,
    SnapshotCorrupt,

    // Herd lifecycle
    RabbitRegistered,
    RabbitUpdated,
    BreedingRecorded,
    BreedingFailed,
    LitterRecorded,
    KitsMaterialized,
    RabbitRetired,

    // Care
    HealthRecorded,
    RepeatIssueDetected,
    ScheduleCreated,
    ScheduleAlertRaised,
    ScheduleCompleted,

    // Commit outcomes
    CatalogWrite,
    CommitConflict,
    CommitRetriesExhausted,
    WriteRejected,

    // Requests
    RequestRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "RABBITRY_STARTUP_BEGIN",
            Event::BootComplete => "RABBITRY_STARTUP_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "RABBITRY_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::SnapshotLoaded => "SNAPSHOT_LOADED",
            Event::SnapshotSaved => "SNAPSHOT_SAVED",
            Event::SnapshotCorrupt => "SNAPSHOT_CORRUPT",

            Event::RabbitRegistered => "RABBIT_REGISTERED",
            Event::RabbitUpdated => "RABBIT_UPDATED",
            Event::BreedingRecorded => "BREEDING_RECORDED",
            Event::BreedingFailed => "BREEDING_MARKED_FAILED",
            Event::LitterRecorded => "LITTER_RECORDED",
            Event::KitsMaterialized => "KITS_MATERIALIZED",
            Event::RabbitRetired => "RABBIT_RETIRED",

            Event::HealthRecorded => "HEALTH_RECORDED",
            Event::RepeatIssueDetected => "REPEAT_ISSUE_DETECTED",
            Event::ScheduleCreated => "SCHEDULE_CREATED",
            Event::ScheduleAlertRaised => "SCHEDULE_ALERT_RAISED",
            Event::ScheduleCompleted => "SCHEDULE_COMPLETED",

            Event::CatalogWrite => "CATALOG_WRITE",
            Event::CommitConflict => "COMMIT_CONFLICT",
            Event::CommitRetriesExhausted => "COMMIT_RETRIES_EXHAUSTED",
            Event::WriteRejected => "WRITE_REJECTED",

            Event::RequestRejected => "REQUEST_REJECTED",
        }
    }

    /// Severity the event is logged at.
    pub fn severity(&self) -> Severity {
        match self {
            Event::SnapshotCorrupt => Severity::Fatal,
            Event::CommitRetriesExhausted => Severity::Error,
            Event::RepeatIssueDetected
            | Event::ScheduleAlertRaised
            | Event::CommitConflict
            | Event::WriteRejected
            | Event::RequestRejected => Severity::Warn,
            Event::CatalogWrite => Severity::Trace,
            _ => Severity::Info,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
