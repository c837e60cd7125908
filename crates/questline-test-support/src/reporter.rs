use std::sync::Mutex;

use questline_core::completion::CompletionReporter;
use uuid::Uuid;

/// One call received by [`RecordingCompletionReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Location(Uuid, String),
    Completed(Uuid),
}

/// Completion reporter that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingCompletionReporter {
    reports: Mutex<Vec<Report>>,
}

impl RecordingCompletionReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the calls received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }
}

impl CompletionReporter for RecordingCompletionReporter {
    fn report_location(&self, aggregate_id: Uuid, location: &str) {
        self.reports
            .lock()
            .unwrap()
            .push(Report::Location(aggregate_id, location.to_owned()));
    }

    fn report_completed(&self, aggregate_id: Uuid) {
        self.reports
            .lock()
            .unwrap()
            .push(Report::Completed(aggregate_id));
    }
}
