use thiserror::Error;

/// User-facing error categories
///
/// Store and engine detail never reaches these variants; it is logged where
/// the failure is translated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Failed to load songs from the library")]
    LoadFailed,

    #[error("Failed to save to the library")]
    SaveFailed,

    #[error("Failed to delete song {song_id}")]
    DeleteFailed { song_id: String },

    #[error("A song with id {song_id} already exists")]
    DuplicateSong { song_id: String },

    #[error("A playlist with id {playlist_id} already exists")]
    DuplicatePlaylist { playlist_id: String },

    #[error("Invalid song: {0}")]
    InvalidSong(String),

    #[error("File picker is not available")]
    BridgeUnavailable,
}

impl From<core_runtime::Error> for CoreError {
    fn from(err: core_runtime::Error) -> Self {
        match err {
            core_runtime::Error::CapabilityMissing {
                capability,
                message,
            } => CoreError::CapabilityMissing {
                capability,
                message,
            },
            other => CoreError::InitializationFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
