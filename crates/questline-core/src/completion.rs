//! Completion-reporting seam.
//!
//! Learning-management hosts track two things about a learner's run: where
//! they are (a location string) and whether they finished. Adapters for a
//! concrete host implement this trait.

use uuid::Uuid;

/// Sink for location and completion status of a run.
pub trait CompletionReporter: Send + Sync {
    /// The run moved to a new location (a scene, for quests).
    fn report_location(&self, aggregate_id: Uuid, location: &str);

    /// The run reached its end.
    fn report_completed(&self, aggregate_id: Uuid);
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompletionReporter;

impl CompletionReporter for NoopCompletionReporter {
    fn report_location(&self, _aggregate_id: Uuid, _location: &str) {}

    fn report_completed(&self, _aggregate_id: Uuid) {}
}
