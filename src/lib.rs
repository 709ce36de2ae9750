//! MelodyFlow workspace crate.
//!
//! Re-exports the public surface of the workspace crates so host applications
//! can depend on `melodyflow` alone instead of wiring each crate individually.

pub use bridge_traits;
pub use core_library;
pub use core_runtime;
pub use core_service;

pub use core_service::{CoreError, CoreService, LibraryService, NativeBridge};
