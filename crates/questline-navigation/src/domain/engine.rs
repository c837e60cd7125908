//! The navigation engine: one learner's position in one quest.
//!
//! Every transition lands on a position inside the quest. Forward moves and
//! exact jumps push the position they leave onto the history stack; Back pops
//! it, so a learner retraces exactly the route they took, including branch
//! hops. When the history is empty Back walks to the previous stopping
//! position instead.

use std::sync::Arc;

use questline_content::{BranchPath, Position, Quest};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::branch::{BranchAssignment, BranchRegistry};
use super::progress::{HighWaterMark, ProgressTracker};
use super::traversal::{self, Direction, final_stop, stop_after, stop_before};
use crate::error::NavigationError;

/// What a transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Moved to the next stopping position.
    Advanced,
    /// Moved back along the history, or to the previous stopping position.
    Retreated,
    /// Exact jump requested by the caller.
    Jumped,
    /// Moved to the start of a branch.
    EnteredBranch,
    /// Every sibling branch is complete; moved past the furthest one.
    ResumedAfterBranches,
    /// Back to the start of the quest.
    Restarted,
    /// Nothing to do; state unchanged.
    Ignored,
}

/// Scene-level direction of a transition, used to pick a scene animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneDirection {
    /// Landed in a later scene.
    Forward,
    /// Landed in an earlier scene.
    Backward,
    /// Stayed in the same scene.
    Same,
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    /// What happened.
    pub kind: TransitionKind,
    /// Position before the transition.
    pub from: Position,
    /// Position after the transition.
    pub to: Position,
    /// Branch whose completion flag this transition set.
    pub completed_branch: Option<BranchAssignment>,
    /// Whether this transition completed the quest.
    pub quest_completed: bool,
    /// Progress after the transition.
    pub progress_percentage: u8,
}

impl TransitionOutcome {
    /// Scene-level direction of the move.
    #[must_use]
    pub fn scene_direction(&self) -> SceneDirection {
        use std::cmp::Ordering;

        match self.to.scene_index.cmp(&self.from.scene_index) {
            Ordering::Greater => SceneDirection::Forward,
            Ordering::Less => SceneDirection::Backward,
            Ordering::Equal => SceneDirection::Same,
        }
    }

    /// Whether the scene changed.
    #[must_use]
    pub fn changed_scene(&self) -> bool {
        self.to.scene_index != self.from.scene_index
    }

    /// Whether the transition was a no-op.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.kind == TransitionKind::Ignored
    }
}

/// A position left by a forward move or jump, plus the scenes that move
/// skipped over for progress purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The position that was left.
    pub position: Position,
    /// Scenes credited to progress on top of the scene change itself.
    pub skipped_scenes: usize,
}

/// Navigation state of one play-through.
#[derive(Debug, Clone)]
pub struct NavigationEngine {
    quest: Arc<Quest>,
    registry: BranchRegistry,
    current: Position,
    history: Vec<HistoryEntry>,
    progress: ProgressTracker,
    high_water: HighWaterMark,
    completion_signalled: bool,
}

impl NavigationEngine {
    /// Creates an engine at the start of `quest`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Content` if the quest has no scenes or a
    /// scene has no dialogs.
    pub fn new(quest: Arc<Quest>, registry: BranchRegistry) -> Result<Self, NavigationError> {
        quest.validate()?;
        let progress = ProgressTracker::new(quest.scene_count());
        Ok(Self {
            quest,
            registry,
            current: Position::START,
            history: Vec::new(),
            progress,
            high_water: HighWaterMark::default(),
            completion_signalled: false,
        })
    }

    #[must_use]
    pub fn quest(&self) -> &Quest {
        &self.quest
    }

    #[must_use]
    pub fn registry(&self) -> &BranchRegistry {
        &self.registry
    }

    #[must_use]
    pub fn current(&self) -> Position {
        self.current
    }

    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.progress.percentage()
    }

    #[must_use]
    pub fn high_water_mark(&self) -> &HighWaterMark {
        &self.high_water
    }

    /// Whether the quest was completed in the current pass.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completion_signalled
    }

    /// See [`traversal::find_next_valid_dialog`].
    #[must_use]
    pub fn find_next_valid_dialog(
        &self,
        scene_index: usize,
        dialog_index: isize,
        direction: Direction,
    ) -> Option<Position> {
        traversal::find_next_valid_dialog(&self.quest, scene_index, dialog_index, direction)
    }

    /// Moves one step in `direction`.
    pub fn transition(&mut self, direction: Direction) -> TransitionOutcome {
        match direction {
            Direction::Next => self.advance(),
            Direction::Back => self.retreat(),
        }
    }

    /// Moves to the next stopping position, handling branch exits and the
    /// loop back to the start after the last stopping position.
    pub fn next(&mut self) -> TransitionOutcome {
        self.transition(Direction::Next)
    }

    /// Retraces the last forward move or jump.
    pub fn back(&mut self) -> TransitionOutcome {
        self.transition(Direction::Back)
    }

    /// Jumps to `target`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidPosition` if `target` is outside the
    /// quest. State is unchanged.
    pub fn jump_to(&mut self, target: Position) -> Result<TransitionOutcome, NavigationError> {
        if !self.quest.contains(target) {
            return Err(NavigationError::InvalidPosition(target));
        }
        Ok(self.exact(target, 0, TransitionKind::Jumped))
    }

    /// Jumps to the progress-bar target of `scene_index`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidPosition` if the scene does not exist,
    /// or `NavigationError::JumpNotAllowed` if it lies past the furthest
    /// position reached.
    pub fn jump_to_scene(&mut self, scene_index: usize) -> Result<TransitionOutcome, NavigationError> {
        if scene_index >= self.quest.scene_count() {
            return Err(NavigationError::InvalidPosition(Position::new(scene_index, 0)));
        }
        let target = self
            .high_water
            .progress_bar_target(&self.quest, self.current, scene_index)
            .ok_or(NavigationError::JumpNotAllowed(scene_index))?;
        Ok(self.exact(target, 0, TransitionKind::Jumped))
    }

    /// Enters the branch `path`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::UnknownBranch` if no branch point offers it.
    pub fn choose_branch(&mut self, path: BranchPath) -> Result<TransitionOutcome, NavigationError> {
        let offered = self
            .registry
            .branch(path.start())
            .is_some_and(|branch| branch.path == path);
        if !offered {
            return Err(NavigationError::UnknownBranch(path));
        }
        Ok(self.exact(path.start(), 0, TransitionKind::EnteredBranch))
    }

    /// Returns to the start: clears history, branch completion and progress.
    pub fn restart(&mut self) -> TransitionOutcome {
        let from = self.current;
        self.start_again(from)
    }

    fn advance(&mut self) -> TransitionOutcome {
        let from = self.current;
        let Some(next_valid) = stop_after(&self.quest, from) else {
            return self.start_again(from);
        };

        let mut outcome = if self.registry.is_end_of_branch(from) {
            self.leave_branch(from)
        } else {
            self.exact(next_valid, 0, TransitionKind::Advanced)
        };

        if outcome.kind != TransitionKind::Restarted
            && !self.completion_signalled
            && final_stop(&self.quest) == Some(outcome.to)
        {
            self.completion_signalled = true;
            outcome.quest_completed = true;
            info!(quest_id = %self.quest.id, position = %outcome.to, "quest completed");
        }
        outcome
    }

    fn leave_branch(&mut self, from: Position) -> TransitionOutcome {
        let was_completed = self.registry.branch(from).is_some_and(|b| b.is_completed);
        let completed_branch = self.registry.complete_branch(from);

        let mut outcome = if let Some(sibling) = self.registry.next_branch(from) {
            self.exact(sibling.start(), 0, TransitionKind::EnteredBranch)
        } else {
            let resume = self
                .registry
                .highest_end(from)
                .and_then(|end| stop_after(&self.quest, end));
            match resume {
                Some(target) => {
                    let skipped = if was_completed {
                        self.registry.other_branches_scene_count(from)
                    } else {
                        0
                    };
                    self.exact(target, skipped, TransitionKind::ResumedAfterBranches)
                }
                None => self.start_again(from),
            }
        };
        outcome.completed_branch = completed_branch;
        outcome
    }

    fn retreat(&mut self) -> TransitionOutcome {
        let from = self.current;
        let (target, skipped_scenes) = if let Some(entry) = self.history.pop() {
            (entry.position, entry.skipped_scenes)
        } else if let Some(previous) = stop_before(&self.quest, from) {
            (previous, 0)
        } else {
            return self.finish(TransitionKind::Ignored, from);
        };

        let steps = skipped_scenes + usize::from(target.scene_index != from.scene_index);
        self.progress.retreat(steps);
        self.land(target);
        self.finish(TransitionKind::Retreated, from)
    }

    fn exact(&mut self, target: Position, skipped_scenes: usize, kind: TransitionKind) -> TransitionOutcome {
        let from = self.current;
        self.history.push(HistoryEntry {
            position: from,
            skipped_scenes,
        });
        let steps = skipped_scenes + usize::from(target.scene_index != from.scene_index);
        if steps > 0 {
            self.progress.advance(steps);
        }
        self.land(target);
        self.finish(kind, from)
    }

    fn start_again(&mut self, from: Position) -> TransitionOutcome {
        self.current = Position::START;
        self.history.clear();
        self.registry.reset();
        self.progress.reset();
        self.completion_signalled = false;
        info!(quest_id = %self.quest.id, %from, "starting quest again");
        self.finish(TransitionKind::Restarted, from)
    }

    fn land(&mut self, position: Position) {
        self.current = position;
        self.high_water.record(position);
    }

    fn finish(&self, kind: TransitionKind, from: Position) -> TransitionOutcome {
        let outcome = TransitionOutcome {
            kind,
            from,
            to: self.current,
            completed_branch: None,
            quest_completed: false,
            progress_percentage: self.percentage(),
        };
        debug!(
            ?kind,
            %from,
            to = %outcome.to,
            progress = outcome.progress_percentage,
            "transition"
        );
        outcome
    }
}
