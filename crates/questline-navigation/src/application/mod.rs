//! Application services: quest catalog, command and query handlers.

pub mod catalog;
pub mod command_handlers;
pub mod query_handlers;
