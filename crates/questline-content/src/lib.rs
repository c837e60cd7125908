//! Questline — Quest content.
//!
//! Responsible for the authored quest model (scenes, dialogs, branch
//! destinations), translation lookup, destination-marker extraction from rich
//! text, loading quests from disk, and content version hashing.

pub mod application;
pub mod domain;
pub mod error;

pub use domain::position::{BranchPath, Position};
pub use domain::quest::{Background, Dialog, Quest, Scene, SceneType};
pub use domain::translation::{IdentityTranslator, Translate, Translations};
pub use error::ContentError;
