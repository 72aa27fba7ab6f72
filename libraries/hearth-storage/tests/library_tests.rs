//! Integration tests for the songs and albums slices
//!
//! Covers:
//! - CRUD round trips through `LocalLibraryStore`
//! - Exact, case-sensitive album key lookup
//! - The (name, artist) uniqueness backstop
//! - Artwork fill-if-absent

mod test_helpers;

use hearth_core::{Album, LibraryStore};
use hearth_storage::LocalLibraryStore;
use test_helpers::*;

#[tokio::test]
async fn test_create_and_get_song() {
    let test_db = TestDb::new().await;
    let store = LocalLibraryStore::new(test_db.pool().clone());

    let album = create_test_album(test_db.pool(), "Abbey Road", "The Beatles").await;
    let song = test_song_in("Come Together", &album);

    store.create_song(&song).await.expect("Failed to create song");

    let retrieved = store.get_song(&song.id).await.unwrap().unwrap();
    assert_eq!(retrieved.id, song.id);
    assert_eq!(retrieved.title, "Come Together");
    assert_eq!(retrieved.album_id, Some(album.id.clone()));
    assert_eq!(retrieved.storage_path, song.storage_path);
    assert_eq!(retrieved.track_number, Some(1));
    assert!((retrieved.duration_seconds - 200.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_get_missing_song_returns_none() {
    let test_db = TestDb::new().await;
    let store = LocalLibraryStore::new(test_db.pool().clone());

    let song = test_song("Ghost", "Nowhere", "Nobody");
    assert!(store.get_song(&song.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_album_includes_song_set() {
    let test_db = TestDb::new().await;
    let store = LocalLibraryStore::new(test_db.pool().clone());

    let album = create_test_album(test_db.pool(), "Abbey Road", "The Beatles").await;
    let first = test_song_in("Come Together", &album);
    let mut second = test_song_in("Something", &album);
    second.track_number = Some(2);

    store.create_song(&first).await.unwrap();
    store.create_song(&second).await.unwrap();

    let stored = store.get_album(&album.id).await.unwrap().unwrap();
    assert_eq!(stored.song_ids.len(), 2);
    assert!(stored.song_ids.contains(&first.id));
    assert!(stored.song_ids.contains(&second.id));

    let songs = store.get_songs_by_album(&album.id).await.unwrap();
    let titles: Vec<_> = songs.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Come Together", "Something"]);
}

#[tokio::test]
async fn test_find_album_by_key_is_case_sensitive() {
    let test_db = TestDb::new().await;
    let store = LocalLibraryStore::new(test_db.pool().clone());

    let album = create_test_album(test_db.pool(), "Abbey Road", "The Beatles").await;

    let found = store
        .find_album_by_key("Abbey Road", "The Beatles")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, album.id);

    assert!(store
        .find_album_by_key("abbey road", "The Beatles")
        .await
        .unwrap()
        .is_none());
    assert!(store
        .find_album_by_key("Abbey Road", "the beatles")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_duplicate_album_key_is_rejected() {
    let test_db = TestDb::new().await;
    let store = LocalLibraryStore::new(test_db.pool().clone());

    create_test_album(test_db.pool(), "Abbey Road", "The Beatles").await;

    let duplicate = Album::new("Abbey Road", "The Beatles", None);
    let result = store.create_album(&duplicate).await;
    assert!(result.is_err());

    assert_eq!(count(test_db.pool(), "albums").await, 1);
}

#[tokio::test]
async fn test_same_name_different_artist_are_distinct() {
    let test_db = TestDb::new().await;
    let store = LocalLibraryStore::new(test_db.pool().clone());

    create_test_album(test_db.pool(), "Greatest Hits", "Queen").await;
    create_test_album(test_db.pool(), "Greatest Hits", "ABBA").await;

    let albums = store.get_all_albums().await.unwrap();
    assert_eq!(albums.len(), 2);
}

#[tokio::test]
async fn test_artwork_fills_only_once() {
    let test_db = TestDb::new().await;
    let store = LocalLibraryStore::new(test_db.pool().clone());

    let album = create_test_album(test_db.pool(), "Abbey Road", "The Beatles").await;

    assert!(store.update_album_artwork(&album.id, &[1, 2, 3]).await.unwrap());
    assert!(!store.update_album_artwork(&album.id, &[9, 9, 9]).await.unwrap());

    let stored = store.get_album(&album.id).await.unwrap().unwrap();
    assert_eq!(stored.artwork, Some(vec![1, 2, 3]));
}

#[tokio::test]
async fn test_song_with_unknown_album_is_rejected() {
    let test_db = TestDb::new().await;
    let store = LocalLibraryStore::new(test_db.pool().clone());

    let song = test_song("Orphan", "Missing", "Nobody").with_album(missing_album_id());
    assert!(store.create_song(&song).await.is_err());
    assert_eq!(count(test_db.pool(), "songs").await, 0);
}
