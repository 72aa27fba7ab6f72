use crate::{albums, import, songs};
use async_trait::async_trait;
use hearth_core::{
    error::Result,
    storage::{ImportCommit, LibraryStore},
    types::{Album, AlbumId, Song, SongId},
};
use sqlx::SqlitePool;

/// Local library store using `SQLite`
#[derive(Clone)]
pub struct LocalLibraryStore {
    pool: SqlitePool,
}

impl LocalLibraryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LibraryStore for LocalLibraryStore {
    // Songs
    async fn create_song(&self, song: &Song) -> Result<()> {
        Ok(songs::insert(&self.pool, song).await?)
    }

    async fn get_song(&self, id: &SongId) -> Result<Option<Song>> {
        Ok(songs::get_by_id(&self.pool, id).await?)
    }

    async fn get_all_songs(&self) -> Result<Vec<Song>> {
        Ok(songs::get_all(&self.pool).await?)
    }

    async fn get_songs_by_album(&self, album_id: &AlbumId) -> Result<Vec<Song>> {
        Ok(songs::get_by_album(&self.pool, album_id).await?)
    }

    // Albums
    async fn create_album(&self, album: &Album) -> Result<()> {
        Ok(albums::insert(&self.pool, album).await?)
    }

    async fn get_album(&self, id: &AlbumId) -> Result<Option<Album>> {
        Ok(albums::get_by_id(&self.pool, id).await?)
    }

    async fn get_all_albums(&self) -> Result<Vec<Album>> {
        Ok(albums::get_all(&self.pool).await?)
    }

    async fn find_album_by_key(&self, name: &str, artist: &str) -> Result<Option<Album>> {
        Ok(albums::find_by_key(&self.pool, name, artist).await?)
    }

    async fn update_album_artwork(&self, id: &AlbumId, artwork: &[u8]) -> Result<bool> {
        Ok(albums::fill_artwork(&self.pool, id, artwork).await?)
    }

    // Import
    async fn commit_import(&self, commit: &ImportCommit) -> Result<()> {
        Ok(import::commit(&self.pool, commit).await?)
    }
}
