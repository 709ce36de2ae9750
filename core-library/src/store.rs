//! # Record Store
//!
//! Durable, transactional storage for songs and playlists.
//!
//! [`SqliteRecordStore`] is the shared connection handle. It is meant to be
//! created once, wrapped in `Arc`, and injected into every component that needs
//! it. [`LibraryStore::open`] may be called from any number of call sites,
//! concurrently or repeatedly: the first caller creates the pool and upgrades
//! the schema, every other caller waits for and then reuses that pool.
//!
//! ```rust,ignore
//! use core_library::{DatabaseConfig, LibraryStore, SqliteRecordStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(SqliteRecordStore::new(DatabaseConfig::new("library.db")));
//! store.open().await?;
//! store.add_song(&song).await?;
//! let songs = store.get_all_songs().await?;
//! ```
//!
//! Each operation commits on its own; there are no multi-operation batches.

use crate::db::{create_pool, DatabaseConfig};
use crate::error::Result;
use crate::models::{Playlist, Song};
use crate::repositories::{
    PlaylistRepository, SongRepository, SqlitePlaylistRepository, SqliteSongRepository,
};
use async_trait::async_trait;
use crate::error::LibraryError;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

/// Record store operations used by the library service and the native bridge
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Establish the shared connection, upgrading the schema on first open
    ///
    /// Idempotent and safe to call concurrently.
    ///
    /// # Errors
    /// `StoreUnavailable` if the engine refuses to open.
    async fn open(&self) -> Result<()>;

    /// Insert a new song; fails with `DuplicateKey` if the id exists
    async fn add_song(&self, song: &Song) -> Result<()>;

    /// Every stored song, in no guaranteed order
    async fn get_all_songs(&self) -> Result<Vec<Song>>;

    /// Remove a song; removing an unknown id is not an error
    async fn delete_song(&self, id: &str) -> Result<()>;

    /// Insert a new playlist; fails with `DuplicateKey` if the id exists
    async fn add_playlist(&self, playlist: &Playlist) -> Result<()>;

    /// Fetch a playlist; `Ok(None)` when absent
    async fn get_playlist(&self, id: &str) -> Result<Option<Playlist>>;
}

/// SQLite-backed record store
pub struct SqliteRecordStore {
    config: DatabaseConfig,
    pool: OnceCell<SqlitePool>,
    closed: AtomicBool,
}

impl SqliteRecordStore {
    /// Create an unopened store handle
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Create an unopened handle to a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(DatabaseConfig::in_memory())
    }

    pub fn is_open(&self) -> bool {
        self.pool.initialized() && !self.is_closed()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// The shared pool, opening the store first if needed
    ///
    /// A failed open leaves the handle unopened so a later call can try again.
    /// A closed handle stays closed: every call fails with `StoreUnavailable`.
    pub async fn pool(&self) -> Result<&SqlitePool> {
        if self.is_closed() {
            return Err(LibraryError::StoreUnavailable(
                "record store is closed".to_string(),
            ));
        }

        self.pool
            .get_or_try_init(|| async {
                info!(database = %self.config.location(), "Opening record store");
                create_pool(self.config.clone()).await
            })
            .await
    }

    /// Close the underlying pool, waiting for connections to shut down
    ///
    /// The handle cannot be reopened; create a new store instead.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            info!("Record store closed");
        }
    }

    async fn songs(&self) -> Result<SqliteSongRepository> {
        Ok(SqliteSongRepository::new(self.pool().await?.clone()))
    }

    async fn playlists(&self) -> Result<SqlitePlaylistRepository> {
        Ok(SqlitePlaylistRepository::new(self.pool().await?.clone()))
    }
}

#[async_trait]
impl LibraryStore for SqliteRecordStore {
    async fn open(&self) -> Result<()> {
        self.pool().await.map(|_| ())
    }

    #[instrument(skip(self, song), fields(song_id = %song.id))]
    async fn add_song(&self, song: &Song) -> Result<()> {
        self.songs().await?.insert(song).await?;
        debug!("Song added");
        Ok(())
    }

    async fn get_all_songs(&self) -> Result<Vec<Song>> {
        let songs = self.songs().await?.find_all().await?;
        debug!(count = songs.len(), "Fetched all songs");
        Ok(songs)
    }

    #[instrument(skip(self))]
    async fn delete_song(&self, id: &str) -> Result<()> {
        let existed = self.songs().await?.delete(id).await?;
        debug!(existed, "Song delete committed");
        Ok(())
    }

    #[instrument(skip(self, playlist), fields(playlist_id = %playlist.id))]
    async fn add_playlist(&self, playlist: &Playlist) -> Result<()> {
        self.playlists().await?.insert(playlist).await?;
        debug!("Playlist added");
        Ok(())
    }

    async fn get_playlist(&self, id: &str) -> Result<Option<Playlist>> {
        self.playlists().await?.find_by_id(id).await
    }
}
