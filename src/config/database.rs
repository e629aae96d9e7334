use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::errors::AuthError;

/// Connect to the database
///
/// Does NOT run migrations - call `migrate()` separately.
///
/// # Returns
/// * `Ok(DatabaseConnection)` - Connection established successfully
/// * `Err(AuthError)` - Connection failed
pub async fn init_database(database_url: &str) -> Result<DatabaseConnection, AuthError> {
    let db = Database::connect(database_url)
        .await
        .map_err(|e| AuthError::internal_error(format!("Database connection failed: {}", e)))?;

    tracing::debug!("Connected to database: {}", database_url);

    Ok(db)
}

/// Run all pending migrations on the provided database connection
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AuthError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| AuthError::internal_error(format!("Migration failed: {}", e)))?;

    tracing::debug!("Database migrations completed");

    Ok(())
}
