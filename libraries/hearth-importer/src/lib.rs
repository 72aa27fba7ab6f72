//! Hearth Importer
//!
//! Brings audio files into the managed library.
//!
//! # Features
//!
//! - Scoped source access released on every exit path
//! - Extension allow-list validation before anything touches disk
//! - Copy into a flat managed root under a collision-free name
//! - Integrity probe of the copy (symphonia)
//! - Tag extraction (lofty) with filename and "Unknown" fallbacks
//! - Album deduplication serialized per (name, artist) key
//! - Atomic persistence through `LibraryStore::commit_import`
//! - Bounded concurrent batch imports with progress reporting
//!
//! # Architecture
//!
//! - `access`: Source access grants
//! - `formats`: Supported extensions
//! - `placement`: Managed storage root
//! - `probe`: Decode probing
//! - `metadata`: Tag extraction and defaulting
//! - `album_locks`: Per-key album locks
//! - `pipeline`: Orchestration of a single import and of batches
//! - `scanner`: Directory expansion

mod error;
mod types;

pub mod access;
pub mod album_locks;
pub mod formats;
pub mod metadata;
pub mod pipeline;
pub mod placement;
pub mod probe;
pub mod scanner;

pub use access::{AccessGrant, FsSourceAccess, SourceAccess};
pub use error::ImportError;
pub use metadata::LoftyExtractor;
pub use pipeline::ImportPipeline;
pub use placement::ManagedStorage;
pub use probe::SymphoniaProbe;
pub use scanner::FileScanner;
pub use types::*;

/// Result alias for import operations
pub type Result<T> = std::result::Result<T, ImportError>;
