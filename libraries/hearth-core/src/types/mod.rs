mod album;
mod ids;
mod metadata;
mod song;

pub use album::{Album, AlbumKey};
pub use ids::{AlbumId, SongId};
pub use metadata::{ExtractedMetadata, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
pub use song::{CreateSong, Song};
