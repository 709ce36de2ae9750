//! Playlist repository trait and implementation
//!
//! Song references are stored as a JSON array in the `song_ids` column so a
//! playlist stays a single keyed record and keeps its order exactly.

use crate::error::{LibraryError, Result};
use crate::models::Playlist;
use crate::schema::PLAYLISTS;
use async_trait::async_trait;
use sqlx::{query, query_as, FromRow, SqlitePool};

/// Playlist repository interface for data access operations
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Find a playlist by its ID
    ///
    /// # Returns
    /// - `Ok(Some(playlist))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_by_id(&self, id: &str) -> Result<Option<Playlist>>;

    /// Insert a new playlist
    ///
    /// # Errors
    /// Returns error if:
    /// - Playlist with same ID already exists (`DuplicateKey`)
    /// - Playlist validation fails
    /// - Database error occurs
    async fn insert(&self, playlist: &Playlist) -> Result<()>;
}

#[derive(FromRow)]
struct PlaylistRow {
    id: String,
    name: String,
    song_ids: String,
}

impl TryFrom<PlaylistRow> for Playlist {
    type Error = LibraryError;

    fn try_from(row: PlaylistRow) -> Result<Self> {
        Ok(Playlist {
            id: row.id,
            name: row.name,
            song_ids: serde_json::from_str(&row.song_ids)?,
        })
    }
}

/// SQLite implementation of PlaylistRepository
pub struct SqlitePlaylistRepository {
    pool: SqlitePool,
}

impl SqlitePlaylistRepository {
    /// Create a new SqlitePlaylistRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaylistRepository for SqlitePlaylistRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Playlist>> {
        let row = query_as::<_, PlaylistRow>(
            "SELECT id, name, song_ids FROM playlists WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Playlist::try_from).transpose()
    }

    async fn insert(&self, playlist: &Playlist) -> Result<()> {
        playlist
            .validate()
            .map_err(|e| LibraryError::InvalidInput {
                field: "playlist".to_string(),
                message: e,
            })?;

        let song_ids = serde_json::to_string(&playlist.song_ids)?;
        let mut tx = self.pool.begin().await?;

        query("INSERT INTO playlists (id, name, song_ids) VALUES (?, ?, ?)")
            .bind(&playlist.id)
            .bind(&playlist.name)
            .bind(song_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| LibraryError::from_insert(e, PLAYLISTS, &playlist.id))?;

        tx.commit().await?;

        Ok(())
    }
}
