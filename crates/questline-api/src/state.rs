//! Shared application state.

use std::sync::Arc;

use questline_core::clock::Clock;
use questline_core::completion::CompletionReporter;
use questline_core::repository::EventRepository;
use questline_navigation::application::catalog::QuestCatalog;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of event timestamps.
    pub clock: Arc<dyn Clock>,
    /// Play-through event streams.
    pub event_repository: Arc<dyn EventRepository>,
    /// Quests loaded at startup.
    pub catalog: Arc<QuestCatalog>,
    /// Host that tracks learner location and completion.
    pub reporter: Arc<dyn CompletionReporter>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        event_repository: Arc<dyn EventRepository>,
        catalog: Arc<QuestCatalog>,
        reporter: Arc<dyn CompletionReporter>,
    ) -> Self {
        Self {
            clock,
            event_repository,
            catalog,
            reporter,
        }
    }
}
