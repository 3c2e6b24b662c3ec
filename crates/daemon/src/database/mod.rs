pub mod models;
mod sqlite;
pub mod types;

use std::ops::Deref;
use std::path::Path;

use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct Database(SqlitePool);

impl Database {
    /// Open (creating if necessary) and migrate a sqlite database file.
    pub async fn connect(path: &Path) -> Result<Self, DatabaseSetupError> {
        let pool = sqlite::connect_sqlite(path).await?;
        sqlite::migrate_sqlite(&pool).await?;
        Ok(Database(pool))
    }

    /// In-memory database, migrated. Used by tests and ephemeral runs.
    pub async fn memory() -> Result<Self, DatabaseSetupError> {
        let pool = sqlite::connect_memory().await?;
        sqlite::migrate_sqlite(&pool).await?;
        Ok(Database(pool))
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }
}

impl Deref for Database {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("error occurred while attempting database migration: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    #[error("unable to perform initial connection and check of the database: {0}")]
    Unavailable(#[from] sqlx::Error),
}
