//! # Repository Pattern Implementation
//!
//! One repository per collection. Traits define the interface; the SQLite
//! implementations use sqlx for async database access.
//!
//! ## Available Repositories
//!
//! - `SongRepository` - the `songs` collection
//! - `PlaylistRepository` - the `playlists` collection

pub mod playlist;
pub mod song;

pub use playlist::{PlaylistRepository, SqlitePlaylistRepository};
pub use song::{SongRepository, SqliteSongRepository};
