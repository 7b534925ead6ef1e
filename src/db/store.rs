//! Storage handle shared by the repositories.

use std::path::{Path, PathBuf};

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::StoreError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a connection waits on a locked database before giving up.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Handle to the SQLite database file.
///
/// Cheap to clone; every operation opens its own connection, so one handle can
/// be passed to any number of repositories.
#[derive(Debug, Clone)]
pub struct Store {
    db_path: PathBuf,
}

impl Store {
    /// Creates a handle for the database at `db_path`.
    ///
    /// The file is created on first connection if it does not exist. Schema is
    /// not touched until [`Store::migrate`] is called.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref().display()))]
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        info!("Creating Store");
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Creates a handle and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref().display()))]
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self::new(db_path);
        store.migrate()?;
        Ok(store)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Applies any embedded migrations not yet run against the database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn migrate(&self) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::storage(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Establishes a database connection with foreign keys enforced.
    #[instrument(skip(self))]
    pub(crate) fn connection(&self) -> Result<SqliteConnection, StoreError> {
        let url = self.db_path.to_string_lossy();
        debug!(path = %url, "Establishing connection");
        let mut conn = SqliteConnection::establish(&url).map_err(|e| {
            StoreError::storage(format!("Failed to connect to '{}': {}", url, e))
        })?;

        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
            .execute(&mut conn)?;
        Ok(conn)
    }
}
