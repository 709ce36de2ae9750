//! # Native Bridge
//!
//! Turns files picked in the host's native picker into songs.
//!
//! ## Overview
//!
//! The host calls [`FileSelectionHandler::on_file_selected`] with what it
//! knows about the file. The bridge derives a title and format, stamps the
//! import time, stores the song through the [`LibraryService`] and tells the
//! user how it went. Nothing is returned to the host.
//!
//! Going the other way, [`NativeBridge::request_file_selection`] asks the host
//! to open its picker. A core running without a picker (a plain browser, a
//! test harness) reports [`CoreError::BridgeUnavailable`] instead.
//!
//! ## Derivation rules
//!
//! | Song field    | Source                                                   |
//! |---------------|----------------------------------------------------------|
//! | `id`          | `file_id`, verbatim                                      |
//! | `title`       | `file_name` without its last extension                   |
//! | `file_format` | MIME subtype (`audio/mpeg` → `mpeg`), else `unknown`     |
//! | `artist`      | `Unknown Artist`                                         |
//! | `album`       | `Unknown Album`                                          |
//! | `duration`    | `0`                                                      |
//! | `date_added`  | injected clock, ISO-8601 UTC                             |

use crate::error::{CoreError, Result};
use crate::library::LibraryService;
use async_trait::async_trait;
use bridge_traits::{
    BridgeError, Clock, FileSelection, FileSelectionHandler, FileSelectionHost, UserNotice,
    UserNotifier,
};
use core_library::{Song, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
use core_runtime::events::{EventBus, LibraryEvent};
use core_runtime::logging::strip_path;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Format recorded when the MIME type has no usable subtype
pub const UNKNOWN_FORMAT: &str = "unknown";

/// Title for an imported file: the name without its last extension
///
/// A name without a `.`, or whose only `.` is the first character, is used
/// unchanged.
pub fn derive_title(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

/// Format tag for an imported file: the MIME subtype
pub fn derive_file_format(mime_type: &str) -> &str {
    mime_type
        .split('/')
        .nth(1)
        .filter(|subtype| !subtype.is_empty())
        .unwrap_or(UNKNOWN_FORMAT)
}

pub struct NativeBridge {
    library: Arc<LibraryService>,
    notifier: Arc<dyn UserNotifier>,
    host: Option<Arc<dyn FileSelectionHost>>,
    clock: Arc<dyn Clock>,
    event_bus: EventBus,
}

impl NativeBridge {
    pub fn new(
        library: Arc<LibraryService>,
        notifier: Arc<dyn UserNotifier>,
        host: Option<Arc<dyn FileSelectionHost>>,
        clock: Arc<dyn Clock>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            library,
            notifier,
            host,
            clock,
            event_bus,
        }
    }

    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }

    /// Build the song for a selection without storing it
    pub fn song_from_selection(&self, selection: &FileSelection) -> Song {
        Song::new(
            selection.file_id.clone(),
            derive_title(&selection.file_name),
            selection.file_path.clone(),
            derive_file_format(&selection.mime_type),
            self.clock.now_iso8601(),
        )
        .with_artist(UNKNOWN_ARTIST)
        .with_album(UNKNOWN_ALBUM)
        .with_duration(0.0)
    }

    /// Import a selected file as a new song
    ///
    /// # Errors
    ///
    /// Whatever [`LibraryService::add_song`] reports; a reused `file_id`
    /// surfaces as [`CoreError::DuplicateSong`].
    #[instrument(skip(self, selection), fields(file_id = %selection.file_id, file = %strip_path(&selection.file_path)))]
    pub async fn import_file(&self, selection: FileSelection) -> Result<Song> {
        let song = self.song_from_selection(&selection);
        info!(
            title = %song.title,
            format = %song.file_format,
            size = selection.size,
            "Importing selected file"
        );
        self.library.add_song(song).await
    }

    /// Ask the host to open its file picker
    ///
    /// # Errors
    ///
    /// [`CoreError::BridgeUnavailable`] when no host was provided or the host
    /// could not show the picker. The user is told in both cases.
    pub async fn request_file_selection(&self) -> Result<()> {
        let outcome = match &self.host {
            Some(host) => host.request_file_selection(),
            None => Err(BridgeError::NotAvailable("FileSelectionHost".to_string())),
        };

        if let Err(e) = outcome {
            warn!(error = %e, "File selection unavailable");
            self.post(UserNotice::error(
                "File picker is not available. Are you running inside the MelodyFlow app?",
            ))
            .await;
            return Err(CoreError::BridgeUnavailable);
        }

        Ok(())
    }

    async fn post(&self, notice: UserNotice) {
        if let Err(e) = self.notifier.notify(notice).await {
            error!(error = %e, "Failed to show notice");
        }
    }
}

#[async_trait]
impl FileSelectionHandler for NativeBridge {
    async fn on_file_selected(&self, selection: FileSelection) {
        let file_name = selection.file_name.clone();

        match self.import_file(selection).await {
            Ok(song) => {
                self.post(UserNotice::info(format!("Song added: {}", song.title)))
                    .await;
            }
            Err(e) => {
                warn!(error = %e, file_name = %file_name, "Import failed");
                let _ = self.event_bus.emit(LibraryEvent::ImportFailed {
                    file_name: file_name.clone(),
                    message: e.to_string(),
                });
                self.post(UserNotice::error(format!(
                    "Failed to add song: {}",
                    file_name
                )))
                .await;
            }
        }
    }
}
