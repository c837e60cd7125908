//! Routes for starting and navigating play-throughs.
//!
//! Every navigation endpoint loads the play-through's event stream, applies
//! one learner input and appends what it produced. Two concurrent inputs for
//! the same play-through race on the stream version; the loser gets 409.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use questline_content::{BranchPath, Position};
use questline_core::error::DomainError;
use questline_navigation::application::command_handlers;
use questline_navigation::application::query_handlers::{self, PlayThroughView};
use questline_navigation::domain::branch::BranchAssignment;
use questline_navigation::domain::commands::{Navigate, NavigationAction, StartPlayThrough};
use questline_navigation::domain::engine::{SceneDirection, TransitionKind};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct StartPlayThroughRequest {
    /// The catalogued quest to play.
    pub quest_id: String,
}

/// Request body for POST /{id}/jump.
#[derive(Debug, Deserialize)]
pub struct JumpRequest {
    pub scene_index: usize,
    pub dialog_index: usize,
}

/// Request body for POST /{id}/jump-to-scene.
#[derive(Debug, Deserialize)]
pub struct JumpToSceneRequest {
    /// Progress-bar segment the learner clicked.
    pub scene_index: usize,
}

/// Request body for POST /{id}/choose-branch.
#[derive(Debug, Deserialize)]
pub struct ChooseBranchRequest {
    /// Branch destination as authored, e.g. `1_1,2_0`.
    pub destination: String,
}

/// Response body returned after a play-through is started.
#[derive(Debug, Serialize)]
pub struct StartPlayThroughResponse {
    pub play_through_id: Uuid,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

/// Response body returned after a navigation input.
#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub play_through_id: Uuid,
    pub kind: TransitionKind,
    pub from: Position,
    pub to: Position,
    /// Which way the scene animation should run.
    pub scene_direction: SceneDirection,
    pub completed_branch: Option<BranchAssignment>,
    pub quest_completed: bool,
    pub progress_percentage: u8,
    /// IDs of the domain events persisted. Empty for ignored inputs.
    pub event_ids: Vec<Uuid>,
}

/// POST /
#[instrument(skip(state, request), fields(quest_id = %request.quest_id))]
async fn start_play_through(
    State(state): State<AppState>,
    Json(request): Json<StartPlayThroughRequest>,
) -> Result<(StatusCode, Json<StartPlayThroughResponse>), ApiError> {
    let command = StartPlayThrough {
        correlation_id: Uuid::new_v4(),
        quest_id: request.quest_id,
    };

    info!(correlation_id = %command.correlation_id, "handling start_play_through command");

    let result = command_handlers::handle_start_play_through(
        &command,
        &state.catalog,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(StartPlayThroughResponse {
            play_through_id: result.aggregate_id,
            event_ids: result.stored_events.iter().map(|e| e.event_id).collect(),
        }),
    ))
}

async fn navigate(
    state: &AppState,
    play_through_id: Uuid,
    action: NavigationAction,
) -> Result<Json<NavigationResponse>, ApiError> {
    let command = Navigate {
        correlation_id: Uuid::new_v4(),
        play_through_id,
        action,
    };

    info!(
        correlation_id = %command.correlation_id,
        ?action,
        "handling navigate command"
    );

    let result = command_handlers::handle_navigate(
        &command,
        &state.catalog,
        state.clock.as_ref(),
        &*state.event_repository,
        state.reporter.as_ref(),
    )
    .await?;

    let outcome = result.outcome;
    Ok(Json(NavigationResponse {
        play_through_id: result.aggregate_id,
        kind: outcome.kind,
        from: outcome.from,
        to: outcome.to,
        scene_direction: outcome.scene_direction(),
        completed_branch: outcome.completed_branch,
        quest_completed: outcome.quest_completed,
        progress_percentage: outcome.progress_percentage,
        event_ids: result.stored_events.iter().map(|e| e.event_id).collect(),
    }))
}

/// POST /{id}/next
#[instrument(skip(state))]
async fn next(
    State(state): State<AppState>,
    Path(play_through_id): Path<Uuid>,
) -> Result<Json<NavigationResponse>, ApiError> {
    navigate(&state, play_through_id, NavigationAction::Next).await
}

/// POST /{id}/back
#[instrument(skip(state))]
async fn back(
    State(state): State<AppState>,
    Path(play_through_id): Path<Uuid>,
) -> Result<Json<NavigationResponse>, ApiError> {
    navigate(&state, play_through_id, NavigationAction::Back).await
}

/// POST /{id}/jump
#[instrument(skip(state, request))]
async fn jump(
    State(state): State<AppState>,
    Path(play_through_id): Path<Uuid>,
    Json(request): Json<JumpRequest>,
) -> Result<Json<NavigationResponse>, ApiError> {
    let position = Position::new(request.scene_index, request.dialog_index);
    navigate(&state, play_through_id, NavigationAction::JumpTo { position }).await
}

/// POST /{id}/jump-to-scene
#[instrument(skip(state, request))]
async fn jump_to_scene(
    State(state): State<AppState>,
    Path(play_through_id): Path<Uuid>,
    Json(request): Json<JumpToSceneRequest>,
) -> Result<Json<NavigationResponse>, ApiError> {
    let action = NavigationAction::JumpToScene {
        scene_index: request.scene_index,
    };
    navigate(&state, play_through_id, action).await
}

/// POST /{id}/choose-branch
#[instrument(skip(state, request), fields(destination = %request.destination))]
async fn choose_branch(
    State(state): State<AppState>,
    Path(play_through_id): Path<Uuid>,
    Json(request): Json<ChooseBranchRequest>,
) -> Result<Json<NavigationResponse>, ApiError> {
    let destination: BranchPath = request
        .destination
        .parse()
        .map_err(|e: questline_content::ContentError| ApiError(DomainError::Validation(e.to_string())))?;
    navigate(&state, play_through_id, NavigationAction::ChooseBranch { destination }).await
}

/// POST /{id}/restart
#[instrument(skip(state))]
async fn restart(
    State(state): State<AppState>,
    Path(play_through_id): Path<Uuid>,
) -> Result<Json<NavigationResponse>, ApiError> {
    navigate(&state, play_through_id, NavigationAction::Restart).await
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_play_through(
    State(state): State<AppState>,
    Path(play_through_id): Path<Uuid>,
) -> Result<Json<PlayThroughView>, ApiError> {
    let view = query_handlers::get_play_through_by_id(
        play_through_id,
        &state.catalog,
        &*state.event_repository,
    )
    .await?;
    Ok(Json(view))
}

/// Returns the router for play-throughs.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_play_through))
        .route("/{id}", get(get_play_through))
        .route("/{id}/next", post(next))
        .route("/{id}/back", post(back))
        .route("/{id}/jump", post(jump))
        .route("/{id}/jump-to-scene", post(jump_to_scene))
        .route("/{id}/choose-branch", post(choose_branch))
        .route("/{id}/restart", post(restart))
}
