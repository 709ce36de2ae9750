//! # Host Bridge Traits
//!
//! Capability traits the host shell implements for the library core.
//!
//! ## Overview
//!
//! This crate defines the contract between the core library and the shell it
//! runs inside (an Android WebView activity, a desktop window). Each trait is a
//! capability the core needs but cannot provide itself.
//!
//! ## Traits
//!
//! ### Host Integration
//! - [`FileSelectionHost`](host::FileSelectionHost) - Native file picker
//! - [`FileSelectionHandler`](host::FileSelectionHandler) - Inbound selection results
//! - [`UserNotifier`](host::UserNotifier) - Toasts and alerts shown to the user
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Missing Capabilities
//!
//! A missing file picker is not fatal. The core reports it as
//! [`BridgeError::NotAvailable`] and tells the user, instead of panicking:
//!
//! ```ignore
//! let host = self.host.as_ref().ok_or_else(|| {
//!     BridgeError::NotAvailable("FileSelectionHost".to_string())
//! })?;
//! host.request_file_selection()?;
//! ```
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! across async tasks behind `Arc`.

pub mod error;
pub mod host;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use host::{
    ConsoleNotifier, FileSelection, FileSelectionHandler, FileSelectionHost, NoticeLevel,
    UserNotice, UserNotifier,
};
pub use time::{Clock, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
