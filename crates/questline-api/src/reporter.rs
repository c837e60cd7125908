//! Completion reporter that writes to the service log.

use questline_core::completion::CompletionReporter;
use tracing::info;
use uuid::Uuid;

/// Emits location and completion as structured log events, for deployments
/// without a learning-management host attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCompletionReporter;

impl CompletionReporter for TracingCompletionReporter {
    fn report_location(&self, aggregate_id: Uuid, location: &str) {
        info!(play_through_id = %aggregate_id, location, "learner location changed");
    }

    fn report_completed(&self, aggregate_id: Uuid) {
        info!(play_through_id = %aggregate_id, "learner completed quest");
    }
}
