//! Hearth Storage
//!
//! `SQLite` database layer for the Hearth library.
//!
//! This crate provides persistent storage for songs and albums and enforces
//! the album uniqueness key at the schema level.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: `songs` and `albums` each own their own queries
//! - **Atomic Imports**: `import::commit` writes a song and its album change
//!   in one transaction
//!
//! # Example
//!
//! ```rust,no_run
//! use hearth_storage::{LocalLibraryStore, create_pool, run_migrations};
//! use hearth_core::LibraryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://hearth.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = LocalLibraryStore::new(pool);
//! let songs = store.get_all_songs().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod albums;
pub mod import;
pub mod songs;

pub use context::LocalLibraryStore;
pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://hearth.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    // Parse the URL into options so we can configure SQLite behavior
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal) // Concurrent readers alongside the import writer
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30)); // Wait up to 30s for locks

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!(database_url, "SQLite pool ready");

    Ok(pool)
}
