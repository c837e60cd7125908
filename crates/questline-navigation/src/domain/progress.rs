//! Scene-granular progress and the progress-bar high-water mark.

use questline_content::{Position, Quest};
use serde::Serialize;

use super::traversal::first_stop_in_scene;

/// Counts scenes crossed. Moving between dialogs of one scene does not move
/// the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressTracker {
    steps: usize,
    total_scenes: usize,
}

impl ProgressTracker {
    /// Starts at the first step.
    #[must_use]
    pub fn new(total_scenes: usize) -> Self {
        Self {
            steps: 1,
            total_scenes,
        }
    }

    /// Current step count.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Adds `count` steps. A counter already past the last scene wraps to the
    /// first step before adding.
    pub fn advance(&mut self, count: usize) {
        if self.steps > self.total_scenes {
            self.steps = 1;
        }
        self.steps += count;
    }

    /// Removes `count` steps, never going below the first step.
    pub fn retreat(&mut self, count: usize) {
        self.steps = self.steps.saturating_sub(count).max(1);
    }

    /// Back to the first step.
    pub fn reset(&mut self) {
        self.steps = 1;
    }

    /// `round(steps / total_scenes * 100)`, clamped to `0..=100`.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        if self.total_scenes == 0 {
            return 0;
        }
        // Integer round-half-up of steps * 100 / total.
        let rounded = (self.steps * 200 + self.total_scenes) / (2 * self.total_scenes);
        u8::try_from(rounded.min(100)).unwrap_or(100)
    }
}

/// The furthest position reached, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighWaterMark {
    furthest: Position,
}

impl Default for HighWaterMark {
    fn default() -> Self {
        Self {
            furthest: Position::START,
        }
    }
}

impl HighWaterMark {
    /// The furthest position reached.
    #[must_use]
    pub fn furthest(&self) -> Position {
        self.furthest
    }

    /// Records a landing.
    pub fn record(&mut self, position: Position) {
        self.furthest = self.furthest.max(position);
    }

    /// Fill of the progress-bar segment for `scene_index`, 0 to 100.
    #[must_use]
    pub fn scene_fill(&self, quest: &Quest, scene_index: usize) -> u8 {
        use std::cmp::Ordering;

        match scene_index.cmp(&self.furthest.scene_index) {
            Ordering::Less => 100,
            Ordering::Greater => 0,
            Ordering::Equal => {
                let len = quest.scene(scene_index).map_or(0, |s| s.dialogs.len());
                if len == 0 {
                    return 0;
                }
                let fill = (self.furthest.dialog_index + 1) * 100 / len;
                u8::try_from(fill.min(100)).unwrap_or(100)
            }
        }
    }

    /// Fill of every progress-bar segment.
    #[must_use]
    pub fn scene_fills(&self, quest: &Quest) -> Vec<u8> {
        (0..quest.scene_count())
            .map(|scene_index| self.scene_fill(quest, scene_index))
            .collect()
    }

    /// Where a click on the progress-bar segment for `scene_index` lands.
    /// Scenes past the mark are not clickable unless they hold `current`.
    /// The mark's own scene resolves to the mark; earlier scenes to their
    /// first stopping position.
    #[must_use]
    pub fn progress_bar_target(
        &self,
        quest: &Quest,
        current: Position,
        scene_index: usize,
    ) -> Option<Position> {
        if scene_index >= quest.scene_count() {
            return None;
        }
        if scene_index == self.furthest.scene_index {
            return Some(self.furthest);
        }
        if scene_index > self.furthest.scene_index && scene_index != current.scene_index {
            return None;
        }
        Some(first_stop_in_scene(quest, scene_index).unwrap_or(Position::new(scene_index, 0)))
    }
}
