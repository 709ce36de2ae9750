//! Integration tests for CoreService bootstrap
//!
//! - File-backed stores survive a restart of the core
//! - An unopenable store fails bootstrap instead of the first operation
//! - Operations after shutdown fail instead of reopening the store

use bridge_traits::ConsoleNotifier;
use core_library::{LibraryStore, Song};
use core_runtime::config::CoreConfig;
use core_service::{CoreError, CoreService};
use std::path::Path;
use std::sync::Arc;

fn config_for(path: &Path) -> CoreConfig {
    CoreConfig::builder()
        .database_path(path)
        .max_connections(2)
        .notifier(Arc::new(ConsoleNotifier))
        .build()
        .unwrap()
}

fn song(id: &str) -> Song {
    Song::new(
        id,
        format!("Song {id}"),
        format!("/music/{id}.mp3"),
        "mpeg",
        "2024-05-01T12:30:00.000Z",
    )
}

#[tokio::test]
async fn test_bootstrap_opens_store() {
    let core = CoreService::bootstrap(
        CoreConfig::builder()
            .in_memory_database()
            .notifier(Arc::new(ConsoleNotifier))
            .build()
            .unwrap(),
    )
    .await
    .unwrap();

    assert!(core.store().is_open());
    assert!(core.library().load_library().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_library_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("MelodyFlowDB.db");

    let first = CoreService::bootstrap(config_for(&path)).await.unwrap();
    first.library().add_song(song("a1")).await.unwrap();
    first.library().add_song(song("b2")).await.unwrap();
    first.library().remove_song("a1").await.unwrap();
    first.shutdown().await;

    let second = CoreService::bootstrap(config_for(&path)).await.unwrap();
    let songs = second.library().load_library().await.unwrap();

    assert_eq!(songs, vec![song("b2")]);
}

#[tokio::test]
async fn test_operations_after_shutdown_fail() {
    let dir = tempfile::tempdir().unwrap();
    let core = CoreService::bootstrap(config_for(&dir.path().join("library.db")))
        .await
        .unwrap();

    core.shutdown().await;

    assert!(!core.store().is_open());
    assert_eq!(
        core.library().load_library().await,
        Err(CoreError::LoadFailed)
    );
    assert_eq!(
        core.library().add_song(song("a1")).await,
        Err(CoreError::SaveFailed)
    );
}

#[tokio::test]
async fn test_unopenable_store_fails_bootstrap() {
    let dir = tempfile::tempdir().unwrap();

    // A directory cannot be opened as a database file
    let result = CoreService::bootstrap(config_for(dir.path())).await;

    assert!(matches!(result, Err(CoreError::InitializationFailed(_))));
}

#[tokio::test]
async fn test_store_is_shared_between_components() {
    let core = CoreService::bootstrap(
        CoreConfig::builder()
            .in_memory_database()
            .notifier(Arc::new(ConsoleNotifier))
            .build()
            .unwrap(),
    )
    .await
    .unwrap();

    core.library().add_song(song("a1")).await.unwrap();

    // Opening again from another call site reuses the same database
    core.store().open().await.unwrap();
    assert_eq!(core.store().get_all_songs().await.unwrap(), vec![song("a1")]);
}
