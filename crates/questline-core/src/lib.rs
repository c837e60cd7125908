//! Questline Core — shared domain abstractions.
//!
//! This crate defines the traits and types that the content, navigation and
//! persistence crates share. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod completion;
pub mod error;
pub mod event;
pub mod repository;
