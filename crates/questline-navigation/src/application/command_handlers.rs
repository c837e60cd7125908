//! Command handlers for play-throughs.
//!
//! Each handler loads the play-through's stream, rebuilds the aggregate
//! against the catalogued quest, executes the command and appends the
//! resulting events with the version it observed.

use questline_core::aggregate::AggregateRoot;
use questline_core::clock::Clock;
use questline_core::command::Command;
use questline_core::completion::CompletionReporter;
use questline_core::error::DomainError;
use questline_core::repository::{EventRepository, StoredEvent};
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::catalog::{CatalogEntry, QuestCatalog};
use crate::domain::aggregates::PlayThrough;
use crate::domain::commands::{Navigate, StartPlayThrough};
use crate::domain::engine::TransitionOutcome;
use crate::domain::events::{PlayThroughEvent, PlayThroughEventKind};

/// What a command handler persisted.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// The play-through the command targeted.
    pub aggregate_id: Uuid,
    /// Events appended, in order.
    pub stored_events: Vec<StoredEvent>,
}

/// Result of a navigation command.
#[derive(Debug, Clone)]
pub struct NavigationResult {
    /// The play-through the command targeted.
    pub aggregate_id: Uuid,
    /// What the transition did.
    pub outcome: TransitionOutcome,
    /// Events appended, in order. Empty for ignored inputs.
    pub stored_events: Vec<StoredEvent>,
}

fn decode(stored: &StoredEvent) -> Result<PlayThroughEvent, DomainError> {
    let kind: PlayThroughEventKind = serde_json::from_value(stored.payload.clone())
        .map_err(|e| DomainError::Infrastructure(format!("event deserialization failed: {e}")))?;
    Ok(PlayThroughEvent {
        metadata: stored.metadata(),
        kind,
    })
}

fn lookup<'a>(catalog: &'a QuestCatalog, quest_id: &str) -> Result<&'a CatalogEntry, DomainError> {
    catalog
        .get(quest_id)
        .ok_or_else(|| DomainError::Content(format!("quest '{quest_id}' is not in the catalog")))
}

/// Rebuilds a `PlayThrough` from its stored events.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an empty stream,
/// `DomainError::Content` if the quest is gone or its content changed since
/// the play-through started, and `DomainError::Infrastructure` if an event
/// cannot be decoded.
pub(crate) fn reconstitute(
    play_through_id: Uuid,
    stored_events: &[StoredEvent],
    catalog: &QuestCatalog,
) -> Result<PlayThrough, DomainError> {
    let Some(first) = stored_events.first() else {
        return Err(DomainError::AggregateNotFound(play_through_id));
    };
    let PlayThroughEventKind::Started(started) = decode(first)?.kind else {
        return Err(DomainError::Infrastructure(format!(
            "stream of play-through {play_through_id} does not begin with a start event"
        )));
    };

    let entry = lookup(catalog, &started.quest_id)?;
    if entry.version_hash() != started.version_hash {
        return Err(DomainError::Content(format!(
            "quest '{}' changed since play-through {play_through_id} started",
            started.quest_id
        )));
    }

    let mut play_through = PlayThrough::new(play_through_id, entry.engine());
    for stored in stored_events {
        play_through.apply(&decode(stored)?);
    }
    Ok(play_through)
}

fn to_stored_events(play_through: &PlayThrough) -> Vec<StoredEvent> {
    play_through
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_domain_event)
        .collect()
}

/// Handles `StartPlayThrough`: creates a play-through with a new id and
/// persists its start event.
///
/// # Errors
///
/// Returns `DomainError::Content` if the quest is not catalogued, or the
/// repository's error if the append fails.
pub async fn handle_start_play_through(
    command: &StartPlayThrough,
    catalog: &QuestCatalog,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<CommandResult, DomainError> {
    let entry = lookup(catalog, &command.quest_id)?;
    let play_through_id = Uuid::new_v4();
    let mut play_through = PlayThrough::new(play_through_id, entry.engine());

    play_through.start(command.correlation_id(), clock);

    let stored_events = to_stored_events(&play_through);
    repo.append_events(play_through_id, play_through.version(), &stored_events)
        .await?;

    info!(
        command = command.command_type(),
        %play_through_id,
        quest_id = %command.quest_id,
        "play-through started"
    );
    Ok(CommandResult {
        aggregate_id: play_through_id,
        stored_events,
    })
}

/// Handles `Navigate`: applies the learner input and persists the resulting
/// events. Location and completion are reported once the append succeeds.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown play-through,
/// `DomainError::Validation` for a rejected input, or the repository's error
/// (including `ConcurrencyConflict`) if loading or appending fails.
pub async fn handle_navigate(
    command: &Navigate,
    catalog: &QuestCatalog,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
    reporter: &dyn CompletionReporter,
) -> Result<NavigationResult, DomainError> {
    let existing_events = repo.load_events(command.play_through_id).await?;
    let mut play_through = reconstitute(command.play_through_id, &existing_events, catalog)?;

    let outcome = play_through.navigate(command.action, command.correlation_id(), clock)?;

    let stored_events = to_stored_events(&play_through);
    if !stored_events.is_empty() {
        repo.append_events(command.play_through_id, play_through.version(), &stored_events)
            .await?;
        play_through.clear_uncommitted_events();
    }

    if outcome.changed_scene() {
        reporter.report_location(command.play_through_id, &outcome.to.scene_index.to_string());
    }
    if outcome.quest_completed {
        reporter.report_completed(command.play_through_id);
    }

    debug!(
        command = command.command_type(),
        play_through_id = %command.play_through_id,
        kind = ?outcome.kind,
        to = %outcome.to,
        events = stored_events.len(),
        "navigation handled"
    );
    Ok(NavigationResult {
        aggregate_id: command.play_through_id,
        outcome,
        stored_events,
    })
}
