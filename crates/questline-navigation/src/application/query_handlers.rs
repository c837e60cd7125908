//! Query handlers: read-only views of quests and play-throughs.

use questline_content::{Position, SceneType};
use questline_core::aggregate::AggregateRoot;
use questline_core::error::DomainError;
use questline_core::repository::EventRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::catalog::{CatalogEntry, QuestCatalog};
use crate::application::command_handlers;
use crate::domain::branch::BranchPoint;

/// Catalog listing entry.
#[derive(Debug, Serialize)]
pub struct QuestSummaryView {
    pub quest_id: String,
    pub title: String,
    pub scene_count: usize,
    pub has_branches: bool,
    pub version_hash: String,
}

/// One progress-bar segment of a quest outline.
#[derive(Debug, Serialize)]
pub struct SceneOutlineView {
    pub scene_index: usize,
    pub name: Option<String>,
    pub scene_type: SceneType,
    pub dialog_count: usize,
    pub stopping_dialog_count: usize,
}

/// Structure of a quest as the navigation engine sees it.
#[derive(Debug, Serialize)]
pub struct QuestOutlineView {
    pub quest_id: String,
    pub title: String,
    pub scenes: Vec<SceneOutlineView>,
    pub branch_points: Vec<BranchPoint>,
}

/// Read-only view of a play-through.
#[derive(Debug, Serialize)]
pub struct PlayThroughView {
    pub play_through_id: Uuid,
    pub quest_id: String,
    pub position: Position,
    pub progress_percentage: u8,
    pub high_water_mark: Position,
    /// Fill of each progress-bar segment, 0 to 100.
    pub scene_fill: Vec<u8>,
    pub history_depth: usize,
    /// Whether the quest was completed in the current pass.
    pub completed: bool,
    pub completions: u32,
    pub branch_points: Vec<BranchPoint>,
    pub version: i64,
}

fn summary(entry: &CatalogEntry) -> QuestSummaryView {
    let quest = entry.quest();
    QuestSummaryView {
        quest_id: quest.id.clone(),
        title: quest.title.clone(),
        scene_count: quest.scene_count(),
        has_branches: entry.registry().has_branches(),
        version_hash: entry.version_hash().to_owned(),
    }
}

/// Lists catalogued quests ordered by id.
#[must_use]
pub fn list_quests(catalog: &QuestCatalog) -> Vec<QuestSummaryView> {
    catalog.iter().map(summary).collect()
}

/// Outline of one quest.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the quest is not catalogued.
pub fn get_quest_outline(
    quest_id: &str,
    catalog: &QuestCatalog,
) -> Result<QuestOutlineView, DomainError> {
    let entry = catalog
        .get(quest_id)
        .ok_or_else(|| DomainError::Validation(format!("unknown quest '{quest_id}'")))?;
    let quest = entry.quest();
    Ok(QuestOutlineView {
        quest_id: quest.id.clone(),
        title: quest.title.clone(),
        scenes: quest
            .scenes
            .iter()
            .enumerate()
            .map(|(scene_index, scene)| SceneOutlineView {
                scene_index,
                name: scene.name.clone(),
                scene_type: scene.scene_type,
                dialog_count: scene.dialogs.len(),
                stopping_dialog_count: scene.stopping_dialog_count(),
            })
            .collect(),
        branch_points: entry.registry().branch_points().to_vec(),
    })
}

/// Retrieves a play-through by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID,
/// `DomainError::Content` if its quest changed, or
/// `DomainError::Infrastructure` if loading or decoding fails.
pub async fn get_play_through_by_id(
    play_through_id: Uuid,
    catalog: &QuestCatalog,
    repo: &dyn EventRepository,
) -> Result<PlayThroughView, DomainError> {
    let stored_events = repo.load_events(play_through_id).await?;
    let play_through = command_handlers::reconstitute(play_through_id, &stored_events, catalog)?;
    let engine = play_through.engine();

    Ok(PlayThroughView {
        play_through_id,
        quest_id: play_through.quest_id().to_owned(),
        position: engine.current(),
        progress_percentage: engine.percentage(),
        high_water_mark: engine.high_water_mark().furthest(),
        scene_fill: engine.high_water_mark().scene_fills(engine.quest()),
        history_depth: engine.history().len(),
        completed: engine.is_completed(),
        completions: play_through.completions(),
        branch_points: engine.registry().branch_points().to_vec(),
        version: play_through.version(),
    })
}

#[cfg(test)]
mod tests {
    use questline_content::IdentityTranslator;
    use questline_test_support::{
        EmptyEventRepository, FixedClock, QuestBuilder, RecordingCompletionReporter,
        RecordingEventRepository, branching_quest,
    };

    use super::*;
    use crate::application::command_handlers::{handle_navigate, handle_start_play_through};
    use crate::domain::commands::{Navigate, NavigationAction, StartPlayThrough};

    fn catalog() -> QuestCatalog {
        let mut catalog = QuestCatalog::default();
        let (quest, _) = branching_quest();
        catalog.insert(CatalogEntry::build(quest, &IdentityTranslator).unwrap());
        catalog.insert(
            CatalogEntry::build(
                QuestBuilder::new("alpha")
                    .scenes(&[2, 1])
                    .skip_navigation(Position::new(0, 1))
                    .build(),
                &IdentityTranslator,
            )
            .unwrap(),
        );
        catalog
    }

    #[test]
    fn test_list_quests_is_ordered_by_id() {
        let views = list_quests(&catalog());

        let ids: Vec<&str> = views.iter().map(|v| v.quest_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "branching"]);
        assert!(!views[0].has_branches);
        assert!(views[1].has_branches);
    }

    #[test]
    fn test_get_quest_outline_reports_stopping_dialogs_and_branch_points() {
        let outline = get_quest_outline("alpha", &catalog()).unwrap();

        assert_eq!(outline.scenes.len(), 2);
        assert_eq!(outline.scenes[0].dialog_count, 2);
        assert_eq!(outline.scenes[0].stopping_dialog_count, 1);
        assert!(outline.branch_points.is_empty());
    }

    #[test]
    fn test_get_quest_outline_unknown_quest() {
        let result = get_quest_outline("nope", &catalog());

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_play_through_by_id_replays_navigation() {
        // Arrange
        let catalog = catalog();
        let clock = FixedClock::reference();
        let start_repo = RecordingEventRepository::default();
        let started = handle_start_play_through(
            &StartPlayThrough {
                correlation_id: Uuid::new_v4(),
                quest_id: "branching".to_owned(),
            },
            &catalog,
            &clock,
            &start_repo,
        )
        .await
        .unwrap();
        let id = started.aggregate_id;
        let nav_repo = RecordingEventRepository::new(started.stored_events.clone());
        let moved = handle_navigate(
            &Navigate {
                correlation_id: Uuid::new_v4(),
                play_through_id: id,
                action: NavigationAction::Next,
            },
            &catalog,
            &clock,
            &nav_repo,
            &RecordingCompletionReporter::new(),
        )
        .await
        .unwrap();
        let mut stream = started.stored_events;
        stream.extend(moved.stored_events);
        let repo = RecordingEventRepository::new(stream);

        // Act
        let view = get_play_through_by_id(id, &catalog, &repo).await.unwrap();

        // Assert
        assert_eq!(view.play_through_id, id);
        assert_eq!(view.quest_id, "branching");
        assert_eq!(view.position, Position::new(1, 0));
        assert_eq!(view.progress_percentage, 40);
        assert_eq!(view.high_water_mark, Position::new(1, 0));
        assert_eq!(view.scene_fill, vec![100, 50, 0, 0, 0]);
        assert_eq!(view.history_depth, 1);
        assert!(!view.completed);
        assert_eq!(view.version, 2);
    }

    #[tokio::test]
    async fn test_get_play_through_by_id_returns_not_found_when_no_events() {
        // Arrange
        let id = Uuid::new_v4();

        // Act
        let result = get_play_through_by_id(id, &catalog(), &EmptyEventRepository).await;

        // Assert
        match result {
            Err(DomainError::AggregateNotFound(missing)) => assert_eq!(missing, id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }
}
