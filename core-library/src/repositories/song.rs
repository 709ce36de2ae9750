//! Song repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::Song;
use crate::schema::SONGS;
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};

/// Song repository interface for data access operations
///
/// Every write runs in its own transaction and returns only after commit.
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Fetch every song, in no particular order
    async fn find_all(&self) -> Result<Vec<Song>>;

    /// Insert a new song
    ///
    /// # Errors
    /// Returns error if:
    /// - Song with same ID already exists (`DuplicateKey`)
    /// - Song validation fails
    /// - Database error occurs
    async fn insert(&self, song: &Song) -> Result<()>;

    /// Delete a song by ID
    ///
    /// # Returns
    /// - `Ok(true)` if the song was deleted
    /// - `Ok(false)` if the song was not found
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// SQLite implementation of SongRepository
pub struct SqliteSongRepository {
    pool: SqlitePool,
}

impl SqliteSongRepository {
    /// Create a new SQLite song repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SongRepository for SqliteSongRepository {
    async fn find_all(&self) -> Result<Vec<Song>> {
        let songs = query_as::<_, Song>("SELECT * FROM songs")
            .fetch_all(&self.pool)
            .await?;

        Ok(songs)
    }

    async fn insert(&self, song: &Song) -> Result<()> {
        song.validate().map_err(|msg| LibraryError::InvalidInput {
            field: "song".to_string(),
            message: msg,
        })?;

        let mut tx = self.pool.begin().await?;

        query(
            r#"
            INSERT INTO songs (
                id, title, artist, album, duration, file_path, file_format, date_added
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&song.id)
        .bind(&song.title)
        .bind(&song.artist)
        .bind(&song.album)
        .bind(song.duration)
        .bind(&song.file_path)
        .bind(&song.file_format)
        .bind(&song.date_added)
        .execute(&mut *tx)
        .await
        .map_err(|e| LibraryError::from_insert(e, SONGS, &song.id))?;

        tx.commit().await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = query("DELETE FROM songs WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

}
