//! Commands for play-throughs.

use questline_content::{BranchPath, Position};
use questline_core::command::Command;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Starts a new play-through of a catalogued quest.
#[derive(Debug, Clone)]
pub struct StartPlayThrough {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Quest to play.
    pub quest_id: String,
}

impl Command for StartPlayThrough {
    fn command_type(&self) -> &'static str {
        "play_through.start"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// A learner input. Recorded verbatim in `Navigated` events and replayed
/// during reconstitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NavigationAction {
    /// The Next button.
    Next,
    /// The Back button.
    Back,
    /// Jump to an exact dialog.
    JumpTo {
        /// Target dialog.
        position: Position,
    },
    /// A progress-bar segment click.
    JumpToScene {
        /// Clicked segment.
        scene_index: usize,
    },
    /// A branching link click.
    ChooseBranch {
        /// The link's destination.
        destination: BranchPath,
    },
    /// Start the quest over.
    Restart,
}

/// Applies one learner input to an existing play-through.
#[derive(Debug, Clone)]
pub struct Navigate {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Target play-through.
    pub play_through_id: Uuid,
    /// The input.
    pub action: NavigationAction,
}

impl Command for Navigate {
    fn command_type(&self) -> &'static str {
        "play_through.navigate"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
