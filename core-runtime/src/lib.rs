//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the library core:
//! - Logging and tracing setup
//! - Configuration and capability validation
//! - The event bus the UI layer subscribes to
//!
//! ## Overview
//!
//! This crate holds the pieces every other core crate depends on but that
//! carry no library semantics of their own.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, DatabaseLocation};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, EventSeverity, EventStream, LibraryEvent};
