//! Per-element layout results and recalculation requests

use serde::{Deserialize, Serialize};

/// Where a single element ended up after a pass
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Column the element was assigned to (`0..columns`)
    pub column_index: usize,

    /// Vertical offset from the container top (px)
    pub top: f64,

    /// Horizontal offset from the container left (px)
    pub left: f64,

    /// Column width applied to the element (px)
    pub width: f64,
}

/// A deferred recalculation request
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecalculationTask {
    /// Reposition every element, ignoring completion flags
    pub refresh: bool,

    /// Mark the elements this pass positions as complete
    pub loaded: bool,
}

impl RecalculationTask {
    pub fn new(refresh: bool, loaded: bool) -> Self {
        Self { refresh, loaded }
    }

    /// Full settled pass (resize, all images ready, re-init)
    pub fn full() -> Self {
        Self::new(true, true)
    }

    /// Incremental pass that leaves its elements open for refinement
    pub fn provisional() -> Self {
        Self::new(false, false)
    }
}

impl Default for RecalculationTask {
    fn default() -> Self {
        Self::new(false, true)
    }
}
