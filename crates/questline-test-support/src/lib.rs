//! Shared test doubles and quest fixtures for Questline.

mod clock;
mod fixtures;
mod reporter;
mod repository;

pub use clock::FixedClock;
pub use fixtures::{QuestBuilder, branching_quest};
pub use reporter::{RecordingCompletionReporter, Report};
pub use repository::{
    AppendCall, EmptyEventRepository, FailingEventRepository, RecordingEventRepository,
};
