//! Questline — Narrative navigation.
//!
//! Decides where a learner goes next in a quest: linear advancement that
//! skips non-stopping dialogs, branch entry and exit with completion
//! bookkeeping, exact jumps, history-based back navigation, the restart loop,
//! and scene-granular progress.

pub mod application;
pub mod domain;
pub mod error;

pub use error::NavigationError;
