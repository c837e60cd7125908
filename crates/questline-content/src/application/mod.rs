//! Content loading from the quest library on disk.

pub mod loader;
