//! Masonry layout engine
//!
//! Computes column assignments and offsets for the elements of a container.
//! Host-independent: measurements go in, placements come out.

pub mod columns;

pub use columns::{column_width, ColumnState, ItemMetrics, LayoutPass, PassOutcome};
