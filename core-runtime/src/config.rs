//! # Core Configuration Module
//!
//! Provides configuration management for the library core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! holding the store location and the host capabilities the core depends on.
//! Validation is fail-fast: a missing required capability is reported by
//! `build()`, not discovered later when the first song is imported.
//!
//! ## Required
//!
//! - A store location: `database_path` or `in_memory_database`
//! - `UserNotifier` - toasts and alerts for import results
//!
//! ## Optional
//!
//! - `FileSelectionHost` - the native file picker. Without it the core still
//!   runs; requesting a file selection reports the bridge as unavailable.
//! - `Clock` - defaults to the system clock
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .database_path("/data/user/0/app/databases/MelodyFlowDB.db")
//!     .notifier(Arc::new(AndroidToastNotifier::new(activity)))
//!     .file_selection_host(Arc::new(AndroidFilePicker::new(activity)))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // No notifier: fails with an actionable CapabilityMissing error
//! let config = CoreConfig::builder()
//!     .in_memory_database()
//!     .build()
//!     .expect("Should fail - missing UserNotifier");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{Clock, FileSelectionHost, SystemClock, UserNotifier};
use std::path::PathBuf;
use std::sync::Arc;

/// Default pool size for file-backed stores
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Where the record store keeps its data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A SQLite file, created on first open
    File(PathBuf),
    /// A private in-memory database that lives as long as the store handle
    InMemory,
}

/// Core configuration for the library core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Record store location
    pub database: DatabaseLocation,

    /// Maximum pooled connections for a file-backed store
    pub max_connections: u32,

    /// Buffer size of the event bus channel
    pub event_buffer_size: usize,

    /// User-visible notices (required)
    pub notifier: Arc<dyn UserNotifier>,

    /// Native file picker (optional)
    pub file_selection_host: Option<Arc<dyn FileSelectionHost>>,

    /// Time source used to stamp imported songs
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("notifier", &"UserNotifier { ... }")
            .field(
                "file_selection_host",
                &self
                    .file_selection_host
                    .as_ref()
                    .map(|_| "FileSelectionHost { ... }"),
            )
            .field("clock", &"Clock { ... }")
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - Event buffer and pool sizes are non-zero
    pub fn validate(&self) -> Result<()> {
        if let DatabaseLocation::File(path) = &self.database {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("Database path cannot be empty".to_string()));
            }
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.max_connections == 0 {
            return Err(Error::Config(
                "Max connections must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn has_file_selection_host(&self) -> bool {
        self.file_selection_host.is_some()
    }
}

fn notifier_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "UserNotifier".to_string(),
        message: "UserNotifier implementation is required to report import results. \
                 Android: inject a Toast-backed notifier. \
                 Desktop/tests: use bridge_traits::ConsoleNotifier."
            .to_string(),
    }
}

/// Builder for [`CoreConfig`]
#[derive(Default)]
pub struct CoreConfigBuilder {
    database: Option<DatabaseLocation>,
    max_connections: Option<u32>,
    event_buffer_size: Option<usize>,
    notifier: Option<Arc<dyn UserNotifier>>,
    file_selection_host: Option<Arc<dyn FileSelectionHost>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CoreConfigBuilder {
    /// Sets the path of the SQLite database file.
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .database_path("/path/to/MelodyFlowDB.db");
    /// ```
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database = Some(DatabaseLocation::File(path.into()));
        self
    }

    /// Uses a private in-memory database instead of a file.
    pub fn in_memory_database(mut self) -> Self {
        self.database = Some(DatabaseLocation::InMemory);
        self
    }

    /// Sets the pool size used for a file-backed store.
    ///
    /// In-memory stores always use a single connection.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Sets the notifier used for user-visible notices (required).
    pub fn notifier(mut self, notifier: Arc<dyn UserNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Sets the native file picker.
    pub fn file_selection_host(mut self, host: Arc<dyn FileSelectionHost>) -> Self {
        self.file_selection_host = Some(host);
        self
    }

    /// Overrides the time source (tests use `FixedClock`).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no store location was given or a size is zero
    /// - [`Error::CapabilityMissing`] if no `UserNotifier` was provided
    pub fn build(self) -> Result<CoreConfig> {
        let database = self.database.ok_or_else(|| {
            Error::Config(
                "Database location is required. Use .database_path() or .in_memory_database()."
                    .to_string(),
            )
        })?;

        let notifier = self.notifier.ok_or_else(notifier_missing_error)?;

        let config = CoreConfig {
            database,
            max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            notifier,
            file_selection_host: self.file_selection_host,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        };

        config.validate()?;

        Ok(config)
    }
}
