//! Domain models for the music library
//!
//! Records are stored exactly as shown here; display defaults such as
//! "Unknown Artist" are applied by the render helpers, never persisted.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Placeholder shown when a song has no artist.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Placeholder shown when a song has no album.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

// =============================================================================
// Song
// =============================================================================

/// One locally imported audio track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Unique identifier (primary key, immutable)
    pub id: String,
    /// Song title
    pub title: String,
    /// Artist name, if known
    pub artist: Option<String>,
    /// Album name, if known
    pub album: Option<String>,
    /// Duration in seconds, `0` when unknown
    pub duration: f64,
    /// URI or path of the audio resource
    pub file_path: String,
    /// Short format tag derived from the MIME type (mpeg, flac, ogg, ...)
    pub file_format: String,
    /// ISO-8601 creation timestamp, set once
    pub date_added: String,
}

impl Song {
    /// Create a song with no artist, album, or duration.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        file_path: impl Into<String>,
        file_format: impl Into<String>,
        date_added: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: None,
            album: None,
            duration: 0.0,
            file_path: file_path.into(),
            file_format: file_format.into(),
            date_added: date_added.into(),
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    /// Validate song data
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("Song id cannot be empty".to_string());
        }

        if self.title.is_empty() {
            return Err("Song title cannot be empty".to_string());
        }

        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err("Song duration must be a non-negative number of seconds".to_string());
        }

        Ok(())
    }

    /// Artist name for display
    pub fn display_artist(&self) -> &str {
        non_empty(self.artist.as_deref()).unwrap_or(UNKNOWN_ARTIST)
    }

    /// Album name for display
    pub fn display_album(&self) -> &str {
        non_empty(self.album.as_deref()).unwrap_or(UNKNOWN_ALBUM)
    }

    /// Duration formatted as `m:ss`
    pub fn display_duration(&self) -> String {
        format_duration(self.duration)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Format a duration in seconds as `m:ss`.
///
/// Fractional seconds are truncated; negative or non-finite input renders as
/// `0:00`.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

// =============================================================================
// Playlist
// =============================================================================

/// Named, ordered collection of song references
///
/// `song_ids` is not checked against the songs collection; entries may point
/// at songs that have since been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique identifier
    pub id: String,
    /// Playlist name
    pub name: String,
    /// Song ids in playback order
    pub song_ids: Vec<String>,
}

impl Playlist {
    /// Create an empty playlist with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            song_ids: Vec::new(),
        }
    }

    /// Create a playlist with an explicit id
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            song_ids: Vec::new(),
        }
    }

    pub fn with_songs<I, S>(mut self, song_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.song_ids = song_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Validate playlist data
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("Playlist id cannot be empty".to_string());
        }

        if self.name.trim().is_empty() {
            return Err("Playlist name cannot be empty".to_string());
        }

        Ok(())
    }
}
