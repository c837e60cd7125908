//! Command abstractions.

use uuid::Uuid;

/// Trait implemented by every command sent to an aggregate.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable command name used in logs and spans.
    fn command_type(&self) -> &'static str;

    /// Correlation ID that ties the command to the events it produces.
    fn correlation_id(&self) -> Uuid;
}
