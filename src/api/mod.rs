//! Masonry WASM API
//!
//! This module provides the JavaScript-facing API for the masonry layout.
//!
//! # Module Structure
//!
//! - `helpers`: Console logging macros, serde conversions and error conversion
//! - `masonry`: The `Masonry` class (construction, recalculation, events, teardown)

pub mod helpers;
pub mod masonry;

pub use masonry::{ColumnStateView, Masonry};
