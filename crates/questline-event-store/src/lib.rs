//! Questline — Event store.
//!
//! Two `EventRepository` implementations: PostgreSQL for deployments and an
//! in-memory store for local runs and tests.

pub mod in_memory_event_repository;
pub mod pg_event_repository;

use sqlx::PgPool;
use sqlx::migrate::MigrateError;

/// Applies the workspace migrations to `pool`.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the recorded history
/// diverges from the bundled migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
