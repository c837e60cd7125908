//! In-memory implementation of the `EventRepository` trait.
//!
//! Streams live for the lifetime of the process. Appends check the expected
//! version exactly as the PostgreSQL store does.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use questline_core::error::DomainError;
use questline_core::repository::{EventRepository, StoredEvent};
use tracing::debug;
use uuid::Uuid;

/// Process-local event repository.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    streams: RwLock<HashMap<Uuid, Vec<StoredEvent>>>,
}

impl InMemoryEventRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::Infrastructure("in-memory event store lock poisoned".into())
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn load_events(&self, aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        let streams = self.streams.read().map_err(poisoned)?;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut streams = self.streams.write().map_err(poisoned)?;
        let stream = streams.entry(aggregate_id).or_default();
        let actual = stream.last().map_or(0, |e| e.sequence_number);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        stream.extend_from_slice(events);
        debug!(%aggregate_id, version = actual, appended = events.len(), "appended events");
        Ok(())
    }
}
