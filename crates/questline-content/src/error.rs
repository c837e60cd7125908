//! Content authoring and loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while parsing, validating or loading quest content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// A position key that is not of the form `scene_dialog`.
    #[error("malformed position `{input}`: expected `scene_dialog`")]
    MalformedPosition {
        /// The offending input.
        input: String,
    },

    /// A branch destination that does not describe a valid position range.
    #[error("malformed branch reference `{reference}`: {reason}")]
    MalformedBranchReference {
        /// The destination string as authored (after translation).
        reference: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A quest without scenes.
    #[error("quest `{quest_id}` has no scenes")]
    EmptyQuest {
        /// The quest identifier.
        quest_id: String,
    },

    /// A scene without dialogs.
    #[error("quest `{quest_id}` scene {scene_index} has no dialogs")]
    EmptyScene {
        /// The quest identifier.
        quest_id: String,
        /// Index of the empty scene.
        scene_index: usize,
    },

    /// Two quests in the library share an identifier.
    #[error("duplicate quest id `{0}`")]
    DuplicateQuest(String),

    /// A file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A quest file is not valid YAML for the quest model.
    #[error("failed to parse quest file {path}: {source}")]
    Yaml {
        /// The quest file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A locale file is not valid JSON.
    #[error("failed to parse locale file {path}: {source}")]
    Json {
        /// The locale file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}
