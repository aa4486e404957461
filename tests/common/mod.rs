//! Shared test helpers for integration tests.

#![allow(dead_code)]

use pimtrack::config::ServerConfig;
use pimtrack::dashboard::{build_router, AppState};
use pimtrack::db::Database;
use pimtrack::{Registry, Store};

/// Returns the test database URL from the `TEST_DATABASE_URL` environment variable.
/// Panics if the variable is not set.
pub fn test_db_url() -> String {
    std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set for integration tests")
}

/// Returns true if the test database URL is configured.
pub fn has_test_db() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// Connect to the test database with an empty `pim` table and a fresh id sequence.
/// The migration is idempotent, so every call runs it.
pub async fn setup_test_db() -> Database {
    let db = Database::connect(&test_db_url())
        .await
        .expect("Failed to connect to test database");
    db.migrate().await.unwrap();
    // Restarting the sequence makes ids predictable per test. Never done
    // outside tests: production ids are not reused.
    sqlx::raw_sql("TRUNCATE TABLE pim RESTART IDENTITY")
        .execute(db.pool())
        .await
        .unwrap();
    db
}

/// Router over an in-memory registry, optionally preloaded with the demo projects.
pub fn build_memory_app(seeded: bool) -> axum::Router {
    let registry = if seeded {
        Registry::seeded()
    } else {
        Registry::new()
    };
    let state = AppState::new(Store::Memory(registry), ServerConfig::default());
    build_router(state)
}

/// Router over the test database, emptied first.
pub async fn build_db_app() -> axum::Router {
    let db = setup_test_db().await;
    let state = AppState::new(Store::Postgres(db), ServerConfig::default());
    build_router(state)
}

/// A valid creation payload with the given project number.
pub fn project_payload(project_number: &str) -> serde_json::Value {
    serde_json::json!({
        "project_number": project_number,
        "team": "IOT",
        "engineer": "Louie",
        "customer": "DNPH",
        "project_name": "Line monitoring",
        "progress": 25
    })
}
