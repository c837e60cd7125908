//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error shared by every bounded context.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No events exist for the requested aggregate.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict while appending events.
    #[error(
        "concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The version the writer expected.
        expected: i64,
        /// The version found in the store.
        actual: i64,
    },

    /// A request that the domain rejects (e.g. a jump outside the quest).
    #[error("validation error: {0}")]
    Validation(String),

    /// Authored content is broken or no longer matches recorded history.
    #[error("content error: {0}")]
    Content(String),

    /// A persistence or serialization failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
