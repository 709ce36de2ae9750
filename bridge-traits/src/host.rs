//! Host Shell Integration
//!
//! Contracts between the core and the host shell that owns the native file
//! picker and the user-facing notification surface.
//!
//! ## Flow
//!
//! ```text
//! user gesture ──> core ──request_file_selection()──> FileSelectionHost
//!                                                          │
//!                                          (native picker) │
//!                                                          ▼
//!      core <──on_file_selected(FileSelection)── registered FileSelectionHandler
//! ```
//!
//! The selection result is a one-way notification: the host never observes a
//! return value. Outcomes are reported back to the user through a
//! [`UserNotifier`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

/// File picked by the user in the host's native picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSelection {
    /// Host-generated identifier, trusted to be unique within the library
    pub file_id: String,
    /// URI or path of the audio resource, opaque to the core
    pub file_path: String,
    /// Display file name including extension
    pub file_name: String,
    /// MIME type reported by the host (e.g. `audio/mpeg`)
    pub mime_type: String,
    /// File size in bytes
    pub size: u64,
}

impl FileSelection {
    pub fn new(
        file_id: impl Into<String>,
        file_path: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            file_path: file_path.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// Inbound handler the core registers with the host at startup.
#[async_trait::async_trait]
pub trait FileSelectionHandler: Send + Sync {
    /// Called by the host once the user has picked a file.
    async fn on_file_selected(&self, selection: FileSelection);
}

/// Native file picker owned by the host shell.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::host::{FileSelectionHandler, FileSelectionHost};
///
/// struct AndroidPicker { /* JNI handle */ }
///
/// impl FileSelectionHost for AndroidPicker {
///     fn request_file_selection(&self) -> Result<()> {
///         // Fire the ACTION_OPEN_DOCUMENT intent; the result arrives later
///         // through the registered handler.
///         Ok(())
///     }
///
///     fn register_handler(&self, handler: Arc<dyn FileSelectionHandler>) {
///         // Keep the handler for the activity result callback.
///     }
/// }
/// ```
pub trait FileSelectionHost: Send + Sync {
    /// Ask the host to open its file picker. Fire-and-forget.
    fn request_file_selection(&self) -> Result<()>;

    /// Register the handler that receives selection results.
    fn register_handler(&self, handler: Arc<dyn FileSelectionHandler>);
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Short message shown to the user (toast, alert, snackbar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNotice {
    pub level: NoticeLevel,
    pub message: String,
}

impl UserNotice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// User-facing notification surface provided by the host.
#[async_trait::async_trait]
pub trait UserNotifier: Send + Sync {
    async fn notify(&self, notice: UserNotice) -> Result<()>;
}

/// Notifier that prints notices to stdout (development builds).
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

#[async_trait::async_trait]
impl UserNotifier for ConsoleNotifier {
    async fn notify(&self, notice: UserNotice) -> Result<()> {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("{}", notice.message),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_constructors() {
        let info = UserNotice::info("Song added: Track One");
        assert_eq!(info.level, NoticeLevel::Info);
        assert_eq!(info.message, "Song added: Track One");

        let error = UserNotice::error("Failed to add song: x.mp3");
        assert_eq!(error.level, NoticeLevel::Error);
    }

    #[test]
    fn test_file_selection_uses_host_field_names() {
        let selection =
            FileSelection::new("a1", "/x/song.mp3", "Track One.mp3", "audio/mpeg", 1024);
        let json = serde_json::to_value(&selection).unwrap();

        assert_eq!(json["fileId"], "a1");
        assert_eq!(json["filePath"], "/x/song.mp3");
        assert_eq!(json["fileName"], "Track One.mp3");
        assert_eq!(json["mimeType"], "audio/mpeg");
        assert_eq!(json["size"], 1024);
    }

    #[tokio::test]
    async fn test_console_notifier() {
        let notifier = ConsoleNotifier;
        notifier
            .notify(UserNotice::info("Song added: Track One"))
            .await
            .unwrap();
    }
}
