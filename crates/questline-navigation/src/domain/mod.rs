//! Navigation domain.

pub mod aggregates;
pub mod branch;
pub mod commands;
pub mod engine;
pub mod events;
pub mod progress;
pub mod traversal;
