//! Navigation error types.

use questline_content::{BranchPath, ContentError, Position};
use questline_core::error::DomainError;

/// Errors raised while building a branch registry or applying a transition.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// The quest itself is structurally invalid.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// A destination marker on the dialog at `root` did not parse.
    #[error("malformed branch reference '{reference}' at {root}: {reason}")]
    MalformedBranchReference {
        /// Dialog carrying the marker.
        root: Position,
        /// The raw destination text.
        reference: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A destination addresses a position outside the quest.
    #[error("branch {path} declared at {root} lies outside the quest")]
    BranchOutOfBounds {
        /// Dialog declaring the branch.
        root: Position,
        /// The offending range.
        path: BranchPath,
    },

    /// A destination covers a position already owned by another branch.
    #[error("branch {path} overlaps branch {existing} at {position}")]
    OverlappingBranch {
        /// First shared position.
        position: Position,
        /// The branch being registered.
        path: BranchPath,
        /// The branch that already owns `position`.
        existing: BranchPath,
    },

    /// An exact target outside the quest.
    #[error("position {0} does not exist in this quest")]
    InvalidPosition(Position),

    /// A branch choice that no branch point offers.
    #[error("no branch point offers {0}")]
    UnknownBranch(BranchPath),

    /// A progress-bar jump to a scene the learner has not reached.
    #[error("scene {0} has not been reached yet")]
    JumpNotAllowed(usize),
}

impl From<NavigationError> for DomainError {
    fn from(error: NavigationError) -> Self {
        match error {
            NavigationError::InvalidPosition(_)
            | NavigationError::UnknownBranch(_)
            | NavigationError::JumpNotAllowed(_) => DomainError::Validation(error.to_string()),
            NavigationError::Content(_)
            | NavigationError::MalformedBranchReference { .. }
            | NavigationError::BranchOutOfBounds { .. }
            | NavigationError::OverlappingBranch { .. } => DomainError::Content(error.to_string()),
        }
    }
}
