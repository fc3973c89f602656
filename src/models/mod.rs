//! Data model for the masonry layout
//!
//! - `options`: user configuration, breakpoints, and per-pass resolution
//! - `placement`: pass results and recalculation requests

pub mod options;
pub mod placement;

pub use options::{BreakpointOverride, Margin, MasonryOptions, ResolvedOptions};
pub use placement::{Placement, RecalculationTask};
