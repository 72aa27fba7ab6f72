//! Atomic persistence of a single import

use crate::{albums, songs, Result, StorageError};
use hearth_core::storage::{AlbumResolution, ImportCommit};
use sqlx::SqlitePool;
use tracing::debug;

/// Write a song and its album change in one transaction
///
/// Either every row lands or none does. The album is linked through the
/// song's `album_id`, which must match the resolution.
pub async fn commit(pool: &SqlitePool, commit: &ImportCommit) -> Result<()> {
    let album_id = commit.album.album_id();
    if commit.song.album_id.as_ref() != Some(album_id) {
        return Err(StorageError::CorruptRow(format!(
            "song {} is not linked to album {}",
            commit.song.id, album_id
        )));
    }

    let mut tx = pool.begin().await?;

    match &commit.album {
        AlbumResolution::Created(album) => {
            albums::insert(&mut *tx, album).await?;
        }
        AlbumResolution::Existing {
            album_id,
            artwork: Some(artwork),
        } => {
            let filled = albums::fill_artwork(&mut *tx, album_id, artwork).await?;
            debug!(album_id = %album_id, filled, "Artwork fill attempted");
        }
        AlbumResolution::Existing { artwork: None, .. } => {}
    }

    songs::insert(&mut *tx, &commit.song).await?;

    tx.commit().await?;

    debug!(song_id = %commit.song.id, album_id = %album_id, "Import committed");
    Ok(())
}
