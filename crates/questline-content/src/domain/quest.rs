//! The authored quest model: scenes made of dialogs.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::position::{BranchPath, Position};
use crate::error::ContentError;

/// Rendering mode of a scene. Opaque to navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneType {
    /// Dialogs shown one at a time over the background.
    OneAtATime,
    /// Chat transcript beside the background.
    SplitScreenChat,
    /// Alternating chat bubbles.
    TurnBasedChat,
    /// Closing screen.
    EndScreen,
}

/// Scene backdrop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    /// Asset URL.
    pub url: String,
    /// Alternative text key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A single turn within a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialog {
    /// Heading text key.
    #[serde(default)]
    pub heading: String,
    /// Plain body text key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Rich body text key; may embed destination markers once translated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_as_html: Option<String>,
    /// Typed branch destinations offered from this dialog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destinations: Vec<BranchPath>,
    /// Rendered as part of a group but never a stopping position.
    #[serde(default)]
    pub skip_navigation: bool,
    /// Rendering hint: hide the dialogs grouped before this one.
    #[serde(default)]
    pub discard_previous: bool,
}

/// An ordered group of dialogs sharing a background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene label key used by the progress bar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Rendering mode.
    #[serde(rename = "type")]
    pub scene_type: SceneType,
    /// Backdrop.
    pub background: Background,
    /// Dialogs in authoring order.
    pub dialogs: Vec<Dialog>,
}

impl Scene {
    /// Number of dialogs that are stopping positions.
    #[must_use]
    pub fn stopping_dialog_count(&self) -> usize {
        self.dialogs.iter().filter(|d| !d.skip_navigation).count()
    }
}

/// A complete quest: the static input of the navigation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    /// Stable quest identifier.
    pub id: String,
    /// Title text key.
    pub title: String,
    /// Scenes in play order.
    pub scenes: Vec<Scene>,
}

impl Quest {
    /// Checks the structural requirements navigation relies on: at least one
    /// scene, and at least one dialog per scene.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::EmptyQuest` or `ContentError::EmptyScene`.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.scenes.is_empty() {
            return Err(ContentError::EmptyQuest {
                quest_id: self.id.clone(),
            });
        }
        if let Some(scene_index) = self.scenes.iter().position(|s| s.dialogs.is_empty()) {
            return Err(ContentError::EmptyScene {
                quest_id: self.id.clone(),
                scene_index,
            });
        }
        Ok(())
    }

    /// Number of scenes.
    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Total number of dialogs across all scenes.
    #[must_use]
    pub fn dialog_count(&self) -> usize {
        self.scenes.iter().map(|s| s.dialogs.len()).sum()
    }

    /// Returns the scene at `scene_index`.
    #[must_use]
    pub fn scene(&self, scene_index: usize) -> Option<&Scene> {
        self.scenes.get(scene_index)
    }

    /// Returns the dialog at `position`.
    #[must_use]
    pub fn dialog(&self, position: Position) -> Option<&Dialog> {
        self.scenes
            .get(position.scene_index)?
            .dialogs
            .get(position.dialog_index)
    }

    /// Whether `position` addresses an existing dialog.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.dialog(position).is_some()
    }

    /// The last dialog of the last scene, if the quest has any dialog.
    #[must_use]
    pub fn last_position(&self) -> Option<Position> {
        let scene_index = self.scenes.len().checked_sub(1)?;
        let dialog_index = self.scenes[scene_index].dialogs.len().checked_sub(1)?;
        Some(Position::new(scene_index, dialog_index))
    }

    /// Every position in `path`, in reading order. Intermediate scenes are
    /// covered entirely. Positions outside the content are not produced.
    #[must_use]
    pub fn positions_in(&self, path: &BranchPath) -> Vec<Position> {
        let (start, end) = (path.start(), path.end());
        let mut positions = Vec::new();
        for scene_index in start.scene_index..=end.scene_index {
            let Some(scene) = self.scenes.get(scene_index) else {
                break;
            };
            let first = if scene_index == start.scene_index {
                start.dialog_index
            } else {
                0
            };
            let last = if scene_index == end.scene_index {
                end.dialog_index.min(scene.dialogs.len().saturating_sub(1))
            } else {
                scene.dialogs.len().saturating_sub(1)
            };
            positions.extend((first..=last).map(|d| Position::new(scene_index, d)));
        }
        positions
    }

    /// Hex-encoded SHA-256 of the canonical JSON form of the quest. Recorded
    /// by play-throughs so history is never replayed against changed content.
    #[must_use]
    pub fn version_hash(&self) -> String {
        // Derived serialization of this tree has no failure path.
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&canonical);
        digest.iter().fold(String::with_capacity(64), |mut hex, byte| {
            let _ = write!(hex, "{byte:02x}");
            hex
        })
    }
}
