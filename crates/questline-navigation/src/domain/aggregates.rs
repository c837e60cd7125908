//! The play-through aggregate: one learner's run through one quest.

use questline_core::aggregate::AggregateRoot;
use questline_core::clock::Clock;
use questline_core::event::EventMetadata;
use tracing::warn;
use uuid::Uuid;

use super::commands::NavigationAction;
use super::engine::{NavigationEngine, TransitionOutcome};
use super::events::{
    BranchCompleted, Navigated, PlayThroughEvent, PlayThroughEventKind, PlayThroughStarted,
    QuestCompleted,
};
use crate::error::NavigationError;

/// Event-sourced wrapper around a [`NavigationEngine`].
#[derive(Debug)]
pub struct PlayThrough {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Times the quest was completed across all passes.
    pub(crate) completions: u32,
    engine: NavigationEngine,
    uncommitted_events: Vec<PlayThroughEvent>,
}

impl PlayThrough {
    /// Wraps a fresh engine. Nothing is recorded until [`Self::start`].
    #[must_use]
    pub fn new(id: Uuid, engine: NavigationEngine) -> Self {
        Self {
            id,
            version: 0,
            completions: 0,
            engine,
            uncommitted_events: Vec::new(),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    #[must_use]
    pub fn quest_id(&self) -> &str {
        &self.engine.quest().id
    }

    #[must_use]
    pub fn completions(&self) -> u32 {
        self.completions
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    /// Records the start of the play-through, pinning the quest content hash.
    pub fn start(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        let started = PlayThroughStarted {
            play_through_id: self.id,
            quest_id: self.quest_id().to_owned(),
            version_hash: self.engine.quest().version_hash(),
        };
        self.push(PlayThroughEventKind::Started(started), correlation_id, clock);
    }

    /// Applies a learner input. Ignored inputs record nothing.
    ///
    /// # Errors
    ///
    /// Returns the engine's `NavigationError` for rejected inputs; nothing is
    /// recorded and the position is unchanged.
    pub fn navigate(
        &mut self,
        action: NavigationAction,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<TransitionOutcome, NavigationError> {
        let outcome = perform(&mut self.engine, action)?;
        if outcome.is_ignored() {
            return Ok(outcome);
        }

        self.push(
            PlayThroughEventKind::Navigated(Navigated {
                action,
                kind: outcome.kind,
                from: outcome.from,
                to: outcome.to,
                progress_percentage: outcome.progress_percentage,
            }),
            correlation_id,
            clock,
        );

        if let Some(assignment) = outcome.completed_branch {
            let path = self
                .engine
                .registry()
                .point(assignment.root)
                .and_then(|point| point.branches.get(assignment.branch_index))
                .map(|branch| branch.path);
            if let Some(path) = path {
                self.push(
                    PlayThroughEventKind::BranchCompleted(BranchCompleted {
                        root: assignment.root,
                        branch_index: assignment.branch_index,
                        path,
                    }),
                    correlation_id,
                    clock,
                );
            }
        }

        if outcome.quest_completed {
            self.completions += 1;
            let quest_id = self.quest_id().to_owned();
            self.push(
                PlayThroughEventKind::QuestCompleted(QuestCompleted { quest_id }),
                correlation_id,
                clock,
            );
        }

        Ok(outcome)
    }

    fn push(&mut self, kind: PlayThroughEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            self.id,
            self.next_sequence_number(),
            correlation_id,
            clock,
        );
        self.uncommitted_events
            .push(PlayThroughEvent { metadata, kind });
    }
}

fn perform(
    engine: &mut NavigationEngine,
    action: NavigationAction,
) -> Result<TransitionOutcome, NavigationError> {
    match action {
        NavigationAction::Next => Ok(engine.next()),
        NavigationAction::Back => Ok(engine.back()),
        NavigationAction::JumpTo { position } => engine.jump_to(position),
        NavigationAction::JumpToScene { scene_index } => engine.jump_to_scene(scene_index),
        NavigationAction::ChooseBranch { destination } => engine.choose_branch(destination),
        NavigationAction::Restart => Ok(engine.restart()),
    }
}

impl AggregateRoot for PlayThrough {
    type Event = PlayThroughEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            PlayThroughEventKind::Navigated(payload) => {
                if let Err(error) = perform(&mut self.engine, payload.action) {
                    warn!(
                        play_through_id = %self.id,
                        sequence_number = event.metadata.sequence_number,
                        %error,
                        "recorded input rejected during replay"
                    );
                }
            }
            PlayThroughEventKind::QuestCompleted(_) => self.completions += 1,
            PlayThroughEventKind::Started(_) | PlayThroughEventKind::BranchCompleted(_) => {}
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::branch::BranchRegistry;
    use questline_content::{IdentityTranslator, Position, Quest};
    use questline_core::event::DomainEvent;
    use questline_test_support::{FixedClock, QuestBuilder, branching_quest};

    fn play_through(quest: Quest) -> PlayThrough {
        let registry = BranchRegistry::build(&quest, &IdentityTranslator).unwrap();
        let engine = NavigationEngine::new(Arc::new(quest), registry).unwrap();
        PlayThrough::new(Uuid::new_v4(), engine)
    }

    fn event_types(play_through: &PlayThrough) -> Vec<&'static str> {
        play_through
            .uncommitted_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect()
    }

    #[test]
    fn test_start_produces_started_event_with_content_hash() {
        // Arrange
        let quest = QuestBuilder::new("hash").scenes(&[2]).build();
        let expected_hash = quest.version_hash();
        let correlation_id = Uuid::new_v4();
        let clock = FixedClock::reference();
        let mut play_through = play_through(quest);

        // Act
        play_through.start(correlation_id, &clock);

        // Assert
        let events = play_through.uncommitted_events();
        assert_eq!(events.len(), 1);
        let meta = events[0].metadata();
        assert_eq!(meta.aggregate_id, play_through.id);
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.causation_id, correlation_id);
        assert_eq!(meta.occurred_at, clock.0);
        match &events[0].kind {
            PlayThroughEventKind::Started(payload) => {
                assert_eq!(payload.quest_id, "hash");
                assert_eq!(payload.version_hash, expected_hash);
            }
            other => panic!("expected Started, got {other:?}"),
        }
    }

    #[test]
    fn test_navigate_records_navigated_event() {
        let clock = FixedClock::reference();
        let mut play_through = play_through(QuestBuilder::new("nav").scenes(&[2, 1]).build());
        play_through.start(Uuid::new_v4(), &clock);

        let outcome = play_through
            .navigate(NavigationAction::Next, Uuid::new_v4(), &clock)
            .unwrap();

        assert_eq!(outcome.to, Position::new(0, 1));
        assert_eq!(
            event_types(&play_through),
            vec!["play_through.started", "play_through.navigated"]
        );
        assert_eq!(play_through.uncommitted_events()[1].metadata.sequence_number, 2);
    }

    #[test]
    fn test_ignored_input_records_nothing() {
        let clock = FixedClock::reference();
        let mut play_through = play_through(QuestBuilder::new("nav").scenes(&[2]).build());

        let outcome = play_through
            .navigate(NavigationAction::Back, Uuid::new_v4(), &clock)
            .unwrap();

        assert!(outcome.is_ignored());
        assert!(play_through.uncommitted_events().is_empty());
    }

    #[test]
    fn test_rejected_input_records_nothing() {
        let clock = FixedClock::reference();
        let mut play_through = play_through(QuestBuilder::new("nav").scenes(&[2]).build());

        let result = play_through.navigate(
            NavigationAction::JumpTo {
                position: Position::new(4, 0),
            },
            Uuid::new_v4(),
            &clock,
        );

        assert!(matches!(result, Err(NavigationError::InvalidPosition(_))));
        assert!(play_through.uncommitted_events().is_empty());
    }

    #[test]
    fn test_branch_exit_records_branch_completion() {
        // Arrange
        let clock = FixedClock::reference();
        let (quest, root) = branching_quest();
        let mut play_through = play_through(quest);
        play_through
            .navigate(
                NavigationAction::JumpTo {
                    position: Position::new(2, 0),
                },
                Uuid::new_v4(),
                &clock,
            )
            .unwrap();

        // Act
        play_through
            .navigate(NavigationAction::Next, Uuid::new_v4(), &clock)
            .unwrap();

        // Assert
        let completed = play_through
            .uncommitted_events()
            .iter()
            .find_map(|e| match &e.kind {
                PlayThroughEventKind::BranchCompleted(payload) => Some(payload.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(completed.root, root);
        assert_eq!(completed.branch_index, 0);
        assert_eq!(completed.path.to_string(), "1_1,2_0");
    }

    #[test]
    fn test_reaching_final_stop_records_quest_completion() {
        let clock = FixedClock::reference();
        let mut play_through = play_through(QuestBuilder::new("short").scenes(&[1, 1]).build());

        play_through
            .navigate(NavigationAction::Next, Uuid::new_v4(), &clock)
            .unwrap();

        assert_eq!(
            event_types(&play_through),
            vec!["play_through.navigated", "play_through.quest_completed"]
        );
        assert_eq!(play_through.completions(), 1);
    }

    #[test]
    fn test_replaying_events_rebuilds_engine_state() {
        // Arrange
        let clock = FixedClock::reference();
        let (quest, _) = branching_quest();
        let mut original = play_through(quest.clone());
        original.start(Uuid::new_v4(), &clock);
        let inputs = [
            NavigationAction::Next,
            NavigationAction::ChooseBranch {
                destination: "3_0,3_1".parse().unwrap(),
            },
            NavigationAction::Next,
            NavigationAction::Next,
            NavigationAction::Back,
            NavigationAction::JumpToScene { scene_index: 0 },
        ];
        for action in inputs {
            original.navigate(action, Uuid::new_v4(), &clock).unwrap();
        }
        let mut replayed = play_through(quest);

        // Act
        for event in original.uncommitted_events() {
            replayed.apply(event);
        }

        // Assert
        assert_eq!(replayed.engine().current(), original.engine().current());
        assert_eq!(replayed.engine().history(), original.engine().history());
        assert_eq!(replayed.engine().percentage(), original.engine().percentage());
        assert_eq!(
            replayed.engine().registry().branch_points(),
            original.engine().registry().branch_points()
        );
        assert_eq!(replayed.version(), 8);
    }
}
