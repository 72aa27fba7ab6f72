//! Album types

use super::{AlbumId, SongId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An album grouping songs that share an exact (name, artist) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub artist: String,
    pub year: Option<i32>,
    /// Embedded cover art, set at most once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
    pub song_ids: HashSet<SongId>,
}

/// Uniqueness key for albums
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlbumKey {
    pub name: String,
    pub artist: String,
}

impl AlbumKey {
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
        }
    }
}

impl Album {
    /// Create a new, empty album
    pub fn new(name: impl Into<String>, artist: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            id: AlbumId::generate(),
            name: name.into(),
            artist: artist.into(),
            year,
            artwork: None,
            created_at: Utc::now(),
            song_ids: HashSet::new(),
        }
    }

    pub fn key(&self) -> AlbumKey {
        AlbumKey::new(self.name.clone(), self.artist.clone())
    }

    pub fn attach_song(&mut self, song_id: SongId) {
        self.song_ids.insert(song_id);
    }

    pub fn has_artwork(&self) -> bool {
        self.artwork.is_some()
    }

    /// Set artwork only if none is present
    ///
    /// Returns true when the artwork was attached.
    pub fn fill_artwork(&mut self, artwork: Vec<u8>) -> bool {
        if self.artwork.is_some() || artwork.is_empty() {
            return false;
        }
        self.artwork = Some(artwork);
        true
    }
}
