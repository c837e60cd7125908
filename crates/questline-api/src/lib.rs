//! Questline — HTTP API.
//!
//! Exposes the quest catalog and play-through navigation over axum. The
//! binary in `main.rs` wires configuration, content loading and the event
//! store; [`app`] builds the router so tests can drive it directly.

pub mod config;
pub mod error;
pub mod reporter;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// The full application router, without transport layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/quests", routes::quests::router())
        .nest("/api/v1/play-throughs", routes::play_throughs::router())
        .with_state(state)
}
