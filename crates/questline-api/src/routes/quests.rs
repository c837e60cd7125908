//! Routes for browsing the quest catalog.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::instrument;

use questline_navigation::application::query_handlers::{
    self, QuestOutlineView, QuestSummaryView,
};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
async fn list_quests(State(state): State<AppState>) -> Json<Vec<QuestSummaryView>> {
    Json(query_handlers::list_quests(&state.catalog))
}

/// GET /{quest_id}
#[instrument(skip(state))]
async fn get_quest_outline(
    State(state): State<AppState>,
    Path(quest_id): Path<String>,
) -> Result<Json<QuestOutlineView>, ApiError> {
    let outline = query_handlers::get_quest_outline(&quest_id, &state.catalog)?;
    Ok(Json(outline))
}

/// Returns the router for the quest catalog.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quests))
        .route("/{quest_id}", get(get_quest_outline))
}
