//! Test helpers and fixtures for storage integration tests
//!
//! Databases are real SQLite files in a temp dir so migrations, constraints
//! and WAL behave as they do in production.

#![allow(dead_code)]

use hearth_core::types::{Album, AlbumId, CreateSong, Song};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = hearth_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        hearth_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Build a song fixture stored under `/library`
pub fn test_song(title: &str, album: &str, artist: &str) -> Song {
    Song::new(CreateSong {
        title: title.to_string(),
        artist: artist.to_string(),
        album_name: album.to_string(),
        duration_seconds: 200.0,
        storage_path: PathBuf::from(format!("/library/{}.mp3", title.replace(' ', "_"))),
        track_number: Some(1),
        year: Some(1969),
    })
}

/// Build a song fixture linked to an album
pub fn test_song_in(title: &str, album: &Album) -> Song {
    test_song(title, &album.name, &album.artist).with_album(album.id.clone())
}

/// Insert an album row and return it
pub async fn create_test_album(pool: &SqlitePool, name: &str, artist: &str) -> Album {
    let album = Album::new(name, artist, Some(1969));
    hearth_storage::albums::insert(pool, &album)
        .await
        .expect("Failed to create test album");
    album
}

/// Count rows in a table
pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}

pub fn missing_album_id() -> AlbumId {
    AlbumId::new("no-such-album")
}
