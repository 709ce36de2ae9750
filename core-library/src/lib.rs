//! # Library Persistence Module
//!
//! Owns the record store holding the music library and provides repository
//! patterns for data access.
//!
//! ## Overview
//!
//! This module manages:
//! - Song and playlist domain models
//! - SQLite connection pooling and the versioned schema
//! - Repositories for the `songs` and `playlists` collections
//! - The shared [`SqliteRecordStore`] handle behind the [`LibraryStore`] trait

pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub use db::DatabaseConfig;
pub use error::{LibraryError, Result};
pub use models::{format_duration, Playlist, Song, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
pub use schema::{SchemaUpgrade, CURRENT_SCHEMA_VERSION};
pub use store::{LibraryStore, SqliteRecordStore};
