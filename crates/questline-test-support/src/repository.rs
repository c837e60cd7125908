//! Event repository doubles.

use std::sync::Mutex;

use async_trait::async_trait;
use questline_core::error::DomainError;
use questline_core::repository::{EventRepository, StoredEvent};
use uuid::Uuid;

/// One `append_events` call: aggregate, expected version, events.
pub type AppendCall = (Uuid, i64, Vec<StoredEvent>);

/// Serves a fixed event stream from `load_events` and records every
/// `append_events` call without persisting it.
#[derive(Debug, Default)]
pub struct RecordingEventRepository {
    stream: Vec<StoredEvent>,
    appended: Mutex<Vec<AppendCall>>,
}

impl RecordingEventRepository {
    /// Serves `stream` for every aggregate id.
    #[must_use]
    pub fn new(stream: Vec<StoredEvent>) -> Self {
        Self {
            stream,
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the recorded appends.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<AppendCall> {
        self.appended.lock().unwrap().clone()
    }

    /// Events of every recorded append, flattened in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_event_types(&self) -> Vec<String> {
        self.appended
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, _, events)| events.iter().map(|e| e.event_type.clone()))
            .collect()
    }
}

#[async_trait]
impl EventRepository for RecordingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(self.stream.clone())
    }

    async fn append_events(
        &self,
        aggregate_id: Uuid,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        self.appended
            .lock()
            .unwrap()
            .push((aggregate_id, expected_version, events.to_vec()));
        Ok(())
    }
}

/// Knows no aggregates and drops appends.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEventRepository;

#[async_trait]
impl EventRepository for EmptyEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Ok(vec![])
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Fails every call with an infrastructure error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEventRepository;

#[async_trait]
impl EventRepository for FailingEventRepository {
    async fn load_events(&self, _aggregate_id: Uuid) -> Result<Vec<StoredEvent>, DomainError> {
        Err(DomainError::Infrastructure("event store unavailable".into()))
    }

    async fn append_events(
        &self,
        _aggregate_id: Uuid,
        _expected_version: i64,
        _events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("event store unavailable".into()))
    }
}
