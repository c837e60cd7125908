//! Questline API server entry point.

use std::sync::Arc;

use questline_content::application::loader;
use questline_core::clock::SystemClock;
use questline_core::repository::EventRepository;
use questline_event_store::in_memory_event_repository::InMemoryEventRepository;
use questline_event_store::pg_event_repository::PgEventRepository;
use questline_navigation::application::catalog::QuestCatalog;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use questline_api::config::AppConfig;
use questline_api::error::AppError;
use questline_api::reporter::TracingCompletionReporter;
use questline_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Questline API server");

    let config = AppConfig::from_env()?;

    // Broken content is fatal: refuse to serve quests the engine cannot navigate.
    let bundles = loader::load_quest_library(&config.quest_dir)?;
    let catalog = QuestCatalog::from_bundles(bundles, &config.locale)?;

    let event_repository = event_repository(&config).await?;

    let app_state = AppState::new(
        Arc::new(SystemClock),
        event_repository,
        Arc::new(catalog),
        Arc::new(TracingCompletionReporter),
    );

    // TODO: Replace CorsLayer::permissive() with the LMS origin once it is configurable.
    let app = questline_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}

async fn event_repository(config: &AppConfig) -> Result<Arc<dyn EventRepository>, AppError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; play-throughs are kept in memory");
        return Ok(Arc::new(InMemoryEventRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    questline_event_store::run_migrations(&pool).await?;
    tracing::info!("PostgreSQL event store ready");

    Ok(Arc::new(PgEventRepository::new(pool)))
}
