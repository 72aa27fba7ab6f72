//! Hearth Core
//!
//! Platform-agnostic core types, traits, and error handling for Hearth.
//!
//! This crate provides the foundational building blocks shared by the
//! storage layer, the import pipeline, and the playback coordinator.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `Album`, `ExtractedMetadata`
//! - **Core Traits**: `LibraryStore`, `MetadataExtractor`, `DecodeProbe`,
//!   `OutputDevice`, `NowPlayingSurface`
//! - **Error Handling**: Unified `HearthError` and `Result` types
//! - **Managed Naming**: `<token>_<original>` file names shared by importer and player
//!
//! # Example
//!
//! ```rust
//! use hearth_core::types::{Album, CreateSong, Song};
//! use std::path::PathBuf;
//!
//! let mut album = Album::new("Abbey Road", "The Beatles", Some(1969));
//!
//! let song = Song::new(CreateSong {
//!     title: "Something".to_string(),
//!     artist: "The Beatles".to_string(),
//!     album_name: album.name.clone(),
//!     duration_seconds: 182.0,
//!     storage_path: PathBuf::from("/library/3f2a_something.flac"),
//!     track_number: Some(2),
//!     year: Some(1969),
//! })
//! .with_album(album.id.clone());
//!
//! album.attach_song(song.id.clone());
//! assert!(album.song_ids.contains(&song.id));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod naming;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{HearthError, Result};
pub use storage::{AlbumResolution, ImportCommit, LibraryStore};
pub use traits::{
    DecodeProbe, DeviceSignal, DeviceSignalSink, MetadataExtractor, NowPlayingInfo,
    NowPlayingSurface, OutputDevice,
};

pub use types::{
    Album, AlbumId, AlbumKey, CreateSong, ExtractedMetadata, Song, SongId, UNKNOWN_ALBUM,
    UNKNOWN_ARTIST,
};
