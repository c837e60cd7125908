//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// An aggregate root whose state is rebuilt by replaying its event stream.
///
/// Command methods on the aggregate mutate its in-memory state directly and
/// queue the events describing what happened; `apply` is only used while
/// reconstituting from stored history.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Number of persisted events applied so far.
    fn version(&self) -> i64;

    /// Replays a persisted event.
    fn apply(&mut self, event: &Self::Event);

    /// Events produced by command handling and not yet persisted.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Drops the uncommitted events once they have been persisted.
    fn clear_uncommitted_events(&mut self);
}
