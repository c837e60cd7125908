//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use questline_content::application::loader;
use questline_core::completion::CompletionReporter;
use questline_event_store::in_memory_event_repository::InMemoryEventRepository;
use questline_navigation::application::catalog::QuestCatalog;
use questline_test_support::{FixedClock, RecordingCompletionReporter};
use tower::ServiceExt;

use questline_api::state::AppState;

/// The quest library shipped with the repository.
pub fn quest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../quests")
}

/// Loads the shipped quest library the same way `main.rs` does.
pub fn catalog(locale: &str) -> QuestCatalog {
    let bundles = loader::load_quest_library(&quest_dir()).unwrap();
    QuestCatalog::from_bundles(bundles, locale).unwrap()
}

/// A running app plus the reporter it writes to.
pub struct TestApp {
    pub router: Router,
    pub reporter: Arc<RecordingCompletionReporter>,
}

/// Build the full app router with an in-memory event store, a fixed clock
/// and the shipped quests. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    let reporter = Arc::new(RecordingCompletionReporter::new());
    let state = AppState::new(
        Arc::new(FixedClock::reference()),
        Arc::new(InMemoryEventRepository::new()),
        Arc::new(catalog("en")),
        Arc::clone(&reporter) as Arc<dyn CompletionReporter>,
    );

    TestApp {
        router: questline_api::app(state),
        reporter,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
