//! Integration tests for the record store
//!
//! These tests exercise the store through its public API:
//! - Round-trips and duplicate-key handling for songs and playlists
//! - Idempotent deletes that leave sibling records untouched
//! - Single-flight `open()` under concurrency
//! - Durability and schema version across reopen of a file-backed store

use core_library::schema::{collection_exists, stored_version, PLAYLISTS, SONGS};
use core_library::{
    DatabaseConfig, LibraryError, LibraryStore, Playlist, Song, SqliteRecordStore,
    CURRENT_SCHEMA_VERSION,
};
use std::collections::HashSet;
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

fn song(id: &str, title: &str) -> Song {
    Song::new(
        id,
        title,
        format!("content://media/external/audio/{id}"),
        "mpeg",
        "2024-05-01T12:30:00.000Z",
    )
}

fn ids(songs: &[Song]) -> HashSet<String> {
    songs.iter().map(|s| s.id.clone()).collect()
}

async fn table_count(store: &SqliteRecordStore, name: &str) -> i64 {
    let pool = store.pool().await.unwrap();
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(name)
            .fetch_one(pool)
            .await
            .unwrap();
    count
}

// ============================================================================
// Songs
// ============================================================================

#[tokio::test]
async fn test_add_then_get_all_round_trips() {
    let store = SqliteRecordStore::in_memory();
    store.open().await.unwrap();

    let inserted = song("a1", "Track One")
        .with_artist("Unknown Artist")
        .with_album("Unknown Album")
        .with_duration(0.0);
    store.add_song(&inserted).await.unwrap();
    store.add_song(&song("b2", "Track Two")).await.unwrap();

    let all = store.get_all_songs().await.unwrap();
    let matching: Vec<&Song> = all.iter().filter(|s| s.id == "a1").collect();

    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0], &inserted);
}

#[tokio::test]
async fn test_duplicate_id_keeps_first_record() {
    let store = SqliteRecordStore::in_memory();

    store.add_song(&song("a1", "Original")).await.unwrap();
    let err = store
        .add_song(&song("a1", "Impostor"))
        .await
        .expect_err("second insert must fail");

    assert!(err.is_duplicate_key(), "unexpected error: {err}");

    let all = store.get_all_songs().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Original");
}

#[tokio::test]
async fn test_delete_missing_id_leaves_collection_unchanged() {
    let store = SqliteRecordStore::in_memory();
    store.add_song(&song("a1", "One")).await.unwrap();
    store.add_song(&song("b2", "Two")).await.unwrap();
    let before = store.get_all_songs().await.unwrap();

    store.delete_song("zzz").await.unwrap();

    let after = store.get_all_songs().await.unwrap();
    assert_eq!(ids(&before), ids(&after));
    assert_eq!(after.len(), 2);
}

#[tokio::test]
async fn test_delete_removes_only_target() {
    let store = SqliteRecordStore::in_memory();
    let keep_a = song("a1", "One").with_duration(180.0);
    let keep_c = song("c3", "Three").with_artist("Someone");
    store.add_song(&keep_a).await.unwrap();
    store.add_song(&song("b2", "Two")).await.unwrap();
    store.add_song(&keep_c).await.unwrap();

    store.delete_song("b2").await.unwrap();

    let mut remaining = store.get_all_songs().await.unwrap();
    remaining.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(remaining, vec![keep_a, keep_c]);
}

#[tokio::test]
async fn test_delete_twice_is_idempotent() {
    let store = SqliteRecordStore::in_memory();
    store.add_song(&song("a1", "One")).await.unwrap();

    store.delete_song("a1").await.unwrap();
    store.delete_song("a1").await.unwrap();

    assert!(store.get_all_songs().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_with_distinct_ids_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteRecordStore::new(DatabaseConfig::new(
        dir.path().join("library.db"),
    )));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.add_song(&song(&format!("s{i}"), "Song")).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.get_all_songs().await.unwrap().len(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_with_same_id_exactly_one_wins() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteRecordStore::new(DatabaseConfig::new(
        dir.path().join("library.db"),
    )));
    store.open().await.unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .add_song(&song("same-id", &format!("Contender {i}")))
                    .await
            })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let outcomes: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();

    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    let duplicates = outcomes
        .iter()
        .filter(|r| matches!(r, Err(LibraryError::DuplicateKey { .. })))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(duplicates, 3);
    assert_eq!(store.get_all_songs().await.unwrap().len(), 1);
}

// ============================================================================
// Playlists
// ============================================================================

#[tokio::test]
async fn test_playlist_round_trip_preserves_order() {
    let store = SqliteRecordStore::in_memory();

    let playlist = Playlist::with_id("p1", "Morning").with_songs(["c", "a", "b", "a"]);
    store.add_playlist(&playlist).await.unwrap();

    let found = store.get_playlist("p1").await.unwrap();
    assert_eq!(found, Some(playlist));
}

#[tokio::test]
async fn test_get_playlist_never_inserted_is_none() {
    let store = SqliteRecordStore::in_memory();
    store.add_playlist(&Playlist::new("Other")).await.unwrap();

    let found = store.get_playlist("never-inserted").await;
    assert!(matches!(found, Ok(None)));
}

#[tokio::test]
async fn test_duplicate_playlist_id_fails() {
    let store = SqliteRecordStore::in_memory();
    store
        .add_playlist(&Playlist::with_id("p1", "First"))
        .await
        .unwrap();

    let err = store
        .add_playlist(&Playlist::with_id("p1", "Second"))
        .await
        .unwrap_err();

    assert!(err.is_duplicate_key());
    assert_eq!(store.get_playlist("p1").await.unwrap().unwrap().name, "First");
}

#[tokio::test]
async fn test_song_deletion_leaves_playlist_references() {
    let store = SqliteRecordStore::in_memory();
    store.add_song(&song("a1", "One")).await.unwrap();
    store
        .add_playlist(&Playlist::with_id("p1", "Mix").with_songs(["a1"]))
        .await
        .unwrap();

    store.delete_song("a1").await.unwrap();

    let playlist = store.get_playlist("p1").await.unwrap().unwrap();
    assert_eq!(playlist.song_ids, vec!["a1"]);
}

// ============================================================================
// Open & schema
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_open_creates_each_collection_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteRecordStore::new(DatabaseConfig::new(dir.path().join("library.db")));

    let (first, second) = tokio::join!(store.open(), store.open());
    first.unwrap();
    second.unwrap();

    assert_eq!(table_count(&store, SONGS).await, 1);
    assert_eq!(table_count(&store, PLAYLISTS).await, 1);
}

#[tokio::test]
async fn test_reopen_preserves_data_and_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");

    let first = SqliteRecordStore::new(DatabaseConfig::new(&path));
    first.add_song(&song("a1", "Persisted")).await.unwrap();
    first.close().await;

    let second = SqliteRecordStore::new(DatabaseConfig::new(&path));
    let songs = second.get_all_songs().await.unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].title, "Persisted");

    let mut conn = second.pool().await.unwrap().acquire().await.unwrap();
    assert_eq!(stored_version(&mut conn).await.unwrap(), CURRENT_SCHEMA_VERSION);
    assert!(collection_exists(&mut conn, SONGS).await.unwrap());
    assert!(collection_exists(&mut conn, PLAYLISTS).await.unwrap());
}

#[tokio::test]
async fn test_newer_schema_on_disk_is_store_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");

    let store = SqliteRecordStore::new(DatabaseConfig::new(&path));
    let pool = store.pool().await.unwrap();
    sqlx::query("PRAGMA user_version = 42")
        .execute(pool)
        .await
        .unwrap();
    store.close().await;

    let reopened = SqliteRecordStore::new(DatabaseConfig::new(&path));
    let result = reopened.open().await;

    assert!(matches!(result, Err(LibraryError::StoreUnavailable(_))));
    assert!(!reopened.is_open());
}
