/// Song domain type
use crate::types::{AlbumId, SongId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// An imported song living in managed storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Unique song identifier
    pub id: SongId,

    /// Song title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name, copied at import time
    ///
    /// Not kept in sync if the owning album is renamed later.
    pub album_name: String,

    /// Duration in seconds (never negative)
    pub duration_seconds: f64,

    /// Path of the file inside the managed storage root
    pub storage_path: PathBuf,

    /// When the song was imported
    pub created_at: DateTime<Utc>,

    /// Track number
    pub track_number: Option<u32>,

    /// Release year
    pub year: Option<i32>,

    /// Owning album (lookup key only)
    pub album_id: Option<AlbumId>,
}

/// Data for creating a new song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSong {
    pub title: String,
    pub artist: String,
    pub album_name: String,
    pub duration_seconds: f64,
    pub storage_path: PathBuf,
    pub track_number: Option<u32>,
    pub year: Option<i32>,
}

impl Song {
    /// Create a new song with a fresh identifier and creation timestamp
    pub fn new(data: CreateSong) -> Self {
        Self {
            id: SongId::generate(),
            title: data.title,
            artist: data.artist,
            album_name: data.album_name,
            duration_seconds: data.duration_seconds.max(0.0),
            storage_path: data.storage_path,
            created_at: Utc::now(),
            track_number: data.track_number,
            year: data.year,
            album_id: None,
        }
    }

    /// Link the song to its album
    #[must_use]
    pub fn with_album(mut self, album_id: AlbumId) -> Self {
        self.album_id = Some(album_id);
        self
    }

    /// Get the song duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_seconds).unwrap_or_default()
    }

    /// File name of the managed copy
    pub fn file_name(&self) -> Option<&str> {
        self.storage_path.file_name().and_then(|n| n.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(duration_seconds: f64) -> CreateSong {
        CreateSong {
            title: "Test Song".to_string(),
            artist: "Test Artist".to_string(),
            album_name: "Test Album".to_string(),
            duration_seconds,
            storage_path: PathBuf::from("/library/abc_song.mp3"),
            track_number: None,
            year: None,
        }
    }

    #[test]
    fn song_creation() {
        let song = Song::new(create(180.0));
        assert_eq!(song.title, "Test Song");
        assert_eq!(song.file_name(), Some("abc_song.mp3"));
        assert!(song.album_id.is_none());
        assert_eq!(song.duration(), Duration::from_secs(180));
    }

    #[test]
    fn negative_duration_is_clamped() {
        let song = Song::new(create(-3.0));
        assert_eq!(song.duration_seconds, 0.0);
    }

    #[test]
    fn with_album_links_album_id() {
        let album_id = AlbumId::new("album-1");
        let song = Song::new(create(10.0)).with_album(album_id.clone());
        assert_eq!(song.album_id, Some(album_id));
    }
}
