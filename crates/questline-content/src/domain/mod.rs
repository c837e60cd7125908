//! Content domain model.

pub mod markers;
pub mod position;
pub mod quest;
pub mod translation;
