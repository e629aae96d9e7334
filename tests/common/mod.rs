// Common test utilities for integration tests

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use inkpost_backend::stores::RoleStore;

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates a test database with migrations applied and built-in roles seeded
pub async fn setup_seeded_db() -> DatabaseConnection {
    let db = setup_test_db().await;

    RoleStore::new(db.clone())
        .seed_roles()
        .await
        .expect("Failed to seed roles");

    db
}

/// Signing secret used across integration tests
pub const TEST_SECRET: &str = "integration-test-signing-secret-key-0001";
