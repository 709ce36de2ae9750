//! # Event Bus System
//!
//! Broadcast-based event bus used to tell the UI layer about library changes.
//!
//! ## Overview
//!
//! The event bus lets the library service and the native bridge publish
//! events that any number of subscribers (list views, toasts, the logging
//! pipeline) consume without the publishers knowing about them. It is built
//! on `tokio::sync::broadcast`.
//!
//! ## Event Categories
//!
//! - **Library Events**: songs loaded, added, deleted; playlists created;
//!   file imports that failed
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, LibraryEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Library(LibraryEvent::SongDeleted {
//!         song_id: "42".to_string(),
//!     }))
//!     .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event.description(), "Song removed from library");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - `emit` fails only when nobody is subscribed. Publishers ignore that case.
//! - Subscribers that fall behind receive `RecvError::Lagged(n)` and should
//!   reload the library rather than trust their incremental state.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel
///
/// Subscribers that fall further behind than this receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published through the event bus
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Library-related events
    Library(LibraryEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Library(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Library(LibraryEvent::ImportFailed { .. }) => EventSeverity::Error,
            CoreEvent::Library(LibraryEvent::SongAdded { .. })
            | CoreEvent::Library(LibraryEvent::SongDeleted { .. })
            | CoreEvent::Library(LibraryEvent::PlaylistCreated { .. }) => EventSeverity::Info,
            CoreEvent::Library(LibraryEvent::LibraryLoaded { .. }) => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Error events
    Error,
}

// ============================================================================
// Library Events
// ============================================================================

/// Events related to the song and playlist collections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum LibraryEvent {
    /// The full song listing was (re)loaded from the store
    LibraryLoaded {
        /// Number of songs in the listing
        song_count: usize,
    },
    /// A song was imported and stored
    SongAdded {
        /// The song ID.
        song_id: String,
        /// Song title.
        title: String,
    },
    /// A song was removed (or was already absent)
    SongDeleted {
        /// The song ID that was deleted.
        song_id: String,
    },
    /// A playlist was created
    PlaylistCreated {
        /// The playlist ID.
        playlist_id: String,
        /// Playlist name.
        name: String,
    },
    /// A file selected on the host could not be imported
    ImportFailed {
        /// Name of the selected file
        file_name: String,
        /// User-facing reason
        message: String,
    },
}

impl LibraryEvent {
    fn description(&self) -> &str {
        match self {
            LibraryEvent::LibraryLoaded { .. } => "Library loaded",
            LibraryEvent::SongAdded { .. } => "Song added to library",
            LibraryEvent::SongDeleted { .. } => "Song removed from library",
            LibraryEvent::PlaylistCreated { .. } => "Playlist created",
            LibraryEvent::ImportFailed { .. } => "File import failed",
        }
    }
}

impl From<LibraryEvent> for CoreEvent {
    fn from(event: LibraryEvent) -> Self {
        CoreEvent::Library(event)
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to core events.
///
/// Cloning is cheap; every clone publishes into the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. `CoreConfig` rejects a zero buffer size
    /// before it gets here.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are no active subscribers.
    pub fn emit(&self, event: impl Into<CoreEvent>) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event.into())
    }

    /// Creates a new subscriber that receives all future events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional event filter
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventSeverity, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let errors = EventStream::new(event_bus.subscribe())
///     .filter(|event| event.severity() == EventSeverity::Error);
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn matches(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive a matching event without waiting.
    ///
    /// Returns `None` if no matching events are currently buffered.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.matches(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
