use crate::{songs, Result};
use chrono::{DateTime, Utc};
use hearth_core::types::{Album, AlbumId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqlitePool};

const SELECT_ALBUM: &str = "SELECT id, name, artist, year, artwork, created_at FROM albums";

/// Map a row without its song set
fn from_row(row: &SqliteRow) -> Result<Album> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Album {
        id: AlbumId::new(row.try_get::<String, _>("id")?),
        name: row.try_get("name")?,
        artist: row.try_get("artist")?,
        year: row.try_get("year")?,
        artwork: row.try_get("artwork")?,
        created_at,
        song_ids: Default::default(),
    })
}

async fn with_songs(pool: &SqlitePool, mut album: Album) -> Result<Album> {
    album.song_ids = songs::ids_by_album(pool, &album.id)
        .await?
        .into_iter()
        .collect();
    Ok(album)
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Album>> {
    let rows = sqlx::query(&format!("{SELECT_ALBUM} ORDER BY name, artist"))
        .fetch_all(pool)
        .await?;

    let mut albums = Vec::with_capacity(rows.len());
    for row in &rows {
        albums.push(with_songs(pool, from_row(row)?).await?);
    }
    Ok(albums)
}

pub async fn get_by_id(pool: &SqlitePool, id: &AlbumId) -> Result<Option<Album>> {
    let row = sqlx::query(&format!("{SELECT_ALBUM} WHERE id = ?"))
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(Some(with_songs(pool, from_row(&row)?).await?)),
        None => Ok(None),
    }
}

/// Exact, case-sensitive lookup by (name, artist)
pub async fn find_by_key(pool: &SqlitePool, name: &str, artist: &str) -> Result<Option<Album>> {
    let row = sqlx::query(&format!(
        "{SELECT_ALBUM} WHERE name = ? COLLATE BINARY AND artist = ? COLLATE BINARY"
    ))
    .bind(name)
    .bind(artist)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(with_songs(pool, from_row(&row)?).await?)),
        None => Ok(None),
    }
}

/// Insert the album row (song links live on the songs table)
pub async fn insert<'e, E>(executor: E, album: &Album) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO albums (id, name, artist, year, artwork, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(album.id.as_str())
    .bind(&album.name)
    .bind(&album.artist)
    .bind(album.year)
    .bind(album.artwork.as_deref())
    .bind(album.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// Set artwork if the album has none
///
/// Returns true when a row was updated.
pub async fn fill_artwork<'e, E>(executor: E, id: &AlbumId, artwork: &[u8]) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE albums SET artwork = ? WHERE id = ? AND artwork IS NULL")
        .bind(artwork)
        .bind(id.as_str())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
