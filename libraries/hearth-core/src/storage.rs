//! Persistence trait for the library

use crate::error::Result;
use crate::types::{Album, AlbumId, Song, SongId};
use async_trait::async_trait;

/// How the album side of an import is persisted
#[derive(Debug, Clone, PartialEq)]
pub enum AlbumResolution {
    /// A new album is created alongside the song
    Created(Album),
    /// The song joins an existing album
    ///
    /// `artwork` is written only if the stored album has none.
    Existing {
        album_id: AlbumId,
        artwork: Option<Vec<u8>>,
    },
}

impl AlbumResolution {
    pub fn album_id(&self) -> &AlbumId {
        match self {
            Self::Created(album) => &album.id,
            Self::Existing { album_id, .. } => album_id,
        }
    }
}

/// Everything a single import persists, written as one unit
#[derive(Debug, Clone, PartialEq)]
pub struct ImportCommit {
    pub song: Song,
    pub album: AlbumResolution,
}

/// Library store
///
/// Holds Song and Album records and enforces identity and the exact
/// (name, artist) album uniqueness key.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    // ========================================================================
    // Songs
    // ========================================================================

    /// Insert a song
    async fn create_song(&self, song: &Song) -> Result<()>;

    /// Get song by ID
    async fn get_song(&self, id: &SongId) -> Result<Option<Song>>;

    /// Get all songs
    async fn get_all_songs(&self) -> Result<Vec<Song>>;

    /// Get songs belonging to an album
    async fn get_songs_by_album(&self, album_id: &AlbumId) -> Result<Vec<Song>>;

    // ========================================================================
    // Albums
    // ========================================================================

    /// Insert an album
    async fn create_album(&self, album: &Album) -> Result<()>;

    /// Get album by ID, including its song set
    async fn get_album(&self, id: &AlbumId) -> Result<Option<Album>>;

    /// Get all albums
    async fn get_all_albums(&self) -> Result<Vec<Album>>;

    /// Find an album by its exact (name, artist) key
    async fn find_album_by_key(&self, name: &str, artist: &str) -> Result<Option<Album>>;

    /// Attach artwork to an album that has none
    ///
    /// Returns false when the album already had artwork.
    async fn update_album_artwork(&self, id: &AlbumId, artwork: &[u8]) -> Result<bool>;

    // ========================================================================
    // Import
    // ========================================================================

    /// Persist a song and its album change atomically
    async fn commit_import(&self, commit: &ImportCommit) -> Result<()>;
}
