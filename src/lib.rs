//! Masonry Layout WASM Module
//!
//! Computes a brick-like, multi-column layout for the children of a container
//! and keeps it correct while images load and the window resizes.
//!
//! The core (`layout`, `queue`, `events`, `loader`, `controller`) is host
//! independent and talks to the page through [`host::Surface`]; `dom` implements
//! that trait with web-sys and `api` exposes the `Masonry` class to JavaScript.

pub mod error;
pub mod models;
pub mod layout;
pub mod queue;
pub mod events;
pub mod loader;
pub mod host;
pub mod controller;
pub mod dom;
pub mod api;

// Re-export commonly used types
pub use controller::{LayoutController, RESIZE_DEBOUNCE_MS};
pub use error::{CollaboratorError, ConfigurationError, MasonryError};
pub use events::{EventBus, MasonryEvent, Subscriber};
pub use host::{ResizeBinding, Surface};
pub use layout::{ColumnState, ItemMetrics};
pub use models::{Margin, MasonryOptions, Placement, RecalculationTask};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("logger already initialized");
    }

    log::info!("Masonry WASM module initialized");
}
