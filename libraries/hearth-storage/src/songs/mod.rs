use crate::{Result, StorageError};
use chrono::{DateTime, Utc};
use hearth_core::types::{AlbumId, Song, SongId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqlitePool};
use std::path::PathBuf;

const SELECT_SONG: &str = "SELECT id, title, artist, album_name, duration_seconds, storage_path,
        created_at, track_number, year, album_id
 FROM songs";

fn from_row(row: &SqliteRow) -> Result<Song> {
    let track_number: Option<i64> = row.try_get("track_number")?;
    let track_number = track_number
        .map(|n| {
            u32::try_from(n).map_err(|_| StorageError::CorruptRow(format!("track number {n}")))
        })
        .transpose()?;
    let album_id: Option<String> = row.try_get("album_id")?;
    let storage_path: String = row.try_get("storage_path")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Song {
        id: SongId::new(row.try_get::<String, _>("id")?),
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        album_name: row.try_get("album_name")?,
        duration_seconds: row.try_get("duration_seconds")?,
        storage_path: PathBuf::from(storage_path),
        created_at,
        track_number,
        year: row.try_get("year")?,
        album_id: album_id.map(AlbumId::new),
    })
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!("{SELECT_SONG} ORDER BY created_at, title"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(from_row).collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: &SongId) -> Result<Option<Song>> {
    let row = sqlx::query(&format!("{SELECT_SONG} WHERE id = ?"))
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(from_row).transpose()
}

pub async fn get_by_album(pool: &SqlitePool, album_id: &AlbumId) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        "{SELECT_SONG} WHERE album_id = ? ORDER BY track_number, title"
    ))
    .bind(album_id.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}

/// IDs of the songs owned by an album
pub async fn ids_by_album<'e, E>(executor: E, album_id: &AlbumId) -> Result<Vec<SongId>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM songs WHERE album_id = ?")
        .bind(album_id.as_str())
        .fetch_all(executor)
        .await?;

    Ok(ids.into_iter().map(SongId::new).collect())
}

pub async fn insert<'e, E>(executor: E, song: &Song) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO songs (id, title, artist, album_name, duration_seconds, storage_path,
                            created_at, track_number, year, album_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(song.id.as_str())
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.album_name)
    .bind(song.duration_seconds)
    .bind(song.storage_path.to_string_lossy().into_owned())
    .bind(song.created_at)
    .bind(song.track_number.map(i64::from))
    .bind(song.year)
    .bind(song.album_id.as_ref().map(AlbumId::as_str))
    .execute(executor)
    .await?;

    Ok(())
}
