//! Domain events for play-throughs.

use questline_content::{BranchPath, Position};
use questline_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::commands::NavigationAction;
use super::engine::TransitionKind;

/// A learner began a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayThroughStarted {
    pub play_through_id: Uuid,
    pub quest_id: String,
    /// Content hash of the quest at start; replay refuses other content.
    pub version_hash: String,
}

/// An accepted learner input and where it led.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigated {
    pub action: NavigationAction,
    pub kind: TransitionKind,
    pub from: Position,
    pub to: Position,
    pub progress_percentage: u8,
}

/// A branch was finished for the first time in this pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCompleted {
    pub root: Position,
    pub branch_index: usize,
    pub path: BranchPath,
}

/// The learner reached the final stopping position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestCompleted {
    pub quest_id: String,
}

/// Event payload variants for play-throughs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayThroughEventKind {
    Started(PlayThroughStarted),
    Navigated(Navigated),
    BranchCompleted(BranchCompleted),
    QuestCompleted(QuestCompleted),
}

/// Domain event envelope for play-throughs.
#[derive(Debug, Clone)]
pub struct PlayThroughEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlayThroughEventKind,
}

impl PlayThroughEventKind {
    /// Stable type name stored alongside the payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started(_) => "play_through.started",
            Self::Navigated(_) => "play_through.navigated",
            Self::BranchCompleted(_) => "play_through.branch_completed",
            Self::QuestCompleted(_) => "play_through.quest_completed",
        }
    }
}

impl DomainEvent for PlayThroughEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Derived serialization of the payload has no failure path.
        serde_json::to_value(&self.kind).unwrap_or_default()
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
