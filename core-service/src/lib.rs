//! Core service façade and bootstrap.
//!
//! This crate wires the record store, the event bus and the host-provided
//! capabilities from a [`CoreConfig`] into the two components the UI talks
//! to: the [`LibraryService`] and the [`NativeBridge`].
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use core_service::CoreService;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .database_path("/data/MelodyFlowDB.db")
//!     .notifier(Arc::new(bridge_traits::ConsoleNotifier))
//!     .build()?;
//!
//! let core = CoreService::bootstrap(config).await?;
//! let songs = core.library().load_library().await?;
//! ```

pub mod bridge;
pub mod error;
pub mod library;

pub use bridge::{derive_file_format, derive_title, NativeBridge, UNKNOWN_FORMAT};
pub use error::{CoreError, Result};
pub use library::{LibraryService, SongRemoved};

use bridge_traits::FileSelectionHandler;
use core_library::{DatabaseConfig, LibraryStore, SqliteRecordStore};
use core_runtime::config::{CoreConfig, DatabaseLocation};
use core_runtime::events::EventBus;
use std::sync::Arc;
use tracing::{error, info};

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    store: Arc<SqliteRecordStore>,
    event_bus: EventBus,
    library: Arc<LibraryService>,
    bridge: Arc<NativeBridge>,
}

impl CoreService {
    /// Open the record store and wire every component
    ///
    /// When the config carries a `FileSelectionHost`, the bridge is registered
    /// with it as the inbound file-selection handler.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InitializationFailed`] if the configuration is invalid
    ///   or the store cannot be opened
    /// - [`CoreError::CapabilityMissing`] from configuration validation
    pub async fn bootstrap(config: CoreConfig) -> Result<Self> {
        config.validate()?;
        info!(database = ?config.database, "Bootstrapping library core");

        let db_config = match &config.database {
            DatabaseLocation::File(path) => {
                DatabaseConfig::new(path).max_connections(config.max_connections)
            }
            DatabaseLocation::InMemory => DatabaseConfig::in_memory(),
        };

        let store = Arc::new(SqliteRecordStore::new(db_config));
        store.open().await.map_err(|e| {
            error!(error = %e, "Record store failed to open");
            CoreError::InitializationFailed(e.to_string())
        })?;

        let event_bus = EventBus::new(config.event_buffer_size);
        let library = Arc::new(LibraryService::new(
            Arc::clone(&store) as Arc<dyn LibraryStore>,
            event_bus.clone(),
        ));
        let bridge = Arc::new(NativeBridge::new(
            Arc::clone(&library),
            Arc::clone(&config.notifier),
            config.file_selection_host.clone(),
            Arc::clone(&config.clock),
            event_bus.clone(),
        ));

        if let Some(host) = &config.file_selection_host {
            host.register_handler(Arc::clone(&bridge) as Arc<dyn FileSelectionHandler>);
            info!("File selection handler registered with host");
        }

        Ok(Self {
            store,
            event_bus,
            library,
            bridge,
        })
    }

    pub fn library(&self) -> Arc<LibraryService> {
        Arc::clone(&self.library)
    }

    pub fn bridge(&self) -> Arc<NativeBridge> {
        Arc::clone(&self.bridge)
    }

    /// Event bus the UI subscribes to for library changes
    pub fn events(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn store(&self) -> Arc<SqliteRecordStore> {
        Arc::clone(&self.store)
    }

    /// Close the store's connection pool
    pub async fn shutdown(&self) {
        self.store.close().await;
        info!("Library core shut down");
    }
}
