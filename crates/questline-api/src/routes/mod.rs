//! Route modules.

pub mod health;
pub mod play_throughs;
pub mod quests;
