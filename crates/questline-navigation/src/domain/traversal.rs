//! Stopping-position search.
//!
//! A stopping position is a dialog whose `skip_navigation` flag is unset.
//! Every directional move lands on one.

use questline_content::{Position, Quest};
use serde::{Deserialize, Serialize};

/// Direction of a directional transition or search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards the end of the quest.
    Next,
    /// Towards the start of the quest.
    Back,
}

/// Walks from `(scene_index, dialog_index)` in `direction` and returns the
/// first stopping position, the start position included.
///
/// `dialog_index` may run one past either end of its scene: walking `Next`
/// from an index past the last dialog continues at the following scene, and
/// walking `Back` from `-1` continues at the last dialog of the preceding
/// scene. Returns `None` when the walk leaves the quest.
#[must_use]
pub fn find_next_valid_dialog(
    quest: &Quest,
    scene_index: usize,
    dialog_index: isize,
    direction: Direction,
) -> Option<Position> {
    match direction {
        Direction::Next => scan_forward(quest, scene_index, usize::try_from(dialog_index).unwrap_or(0)),
        Direction::Back => {
            let bound = usize::try_from(dialog_index).map_or(0, |d| d.saturating_add(1));
            scan_backward(quest, scene_index, bound)
        }
    }
}

/// First stopping position strictly after `position`.
#[must_use]
pub fn stop_after(quest: &Quest, position: Position) -> Option<Position> {
    scan_forward(quest, position.scene_index, position.dialog_index + 1)
}

/// Last stopping position strictly before `position`.
#[must_use]
pub fn stop_before(quest: &Quest, position: Position) -> Option<Position> {
    scan_backward(quest, position.scene_index, position.dialog_index)
}

/// First stopping position inside `scene_index` itself.
#[must_use]
pub fn first_stop_in_scene(quest: &Quest, scene_index: usize) -> Option<Position> {
    quest
        .scene(scene_index)?
        .dialogs
        .iter()
        .position(|d| !d.skip_navigation)
        .map(|dialog_index| Position::new(scene_index, dialog_index))
}

/// The last stopping position of the quest.
#[must_use]
pub fn final_stop(quest: &Quest) -> Option<Position> {
    let last = quest.last_position()?;
    scan_backward(quest, last.scene_index, last.dialog_index + 1)
}

fn scan_forward(quest: &Quest, scene_index: usize, from_dialog: usize) -> Option<Position> {
    for (s, scene) in quest.scenes.iter().enumerate().skip(scene_index) {
        let from = if s == scene_index {
            from_dialog.min(scene.dialogs.len())
        } else {
            0
        };
        if let Some(offset) = scene.dialogs[from..].iter().position(|d| !d.skip_navigation) {
            return Some(Position::new(s, from + offset));
        }
    }
    None
}

// `bound` is exclusive.
fn scan_backward(quest: &Quest, scene_index: usize, bound: usize) -> Option<Position> {
    let scenes = quest.scenes.get(..=scene_index)?;
    for (s, scene) in scenes.iter().enumerate().rev() {
        let end = if s == scene_index {
            bound.min(scene.dialogs.len())
        } else {
            scene.dialogs.len()
        };
        if let Some(dialog_index) = scene.dialogs[..end].iter().rposition(|d| !d.skip_navigation) {
            return Some(Position::new(s, dialog_index));
        }
    }
    None
}
