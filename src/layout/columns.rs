//! Column assignment
//!
//! Pure geometry: given measured element heights, the resolved options and the
//! container width, decide each element's column and offsets. The caller applies
//! the resulting placements to the host surface.

use crate::error::ConfigurationError;
use crate::models::{Placement, RecalculationTask, ResolvedOptions};

/// What the column model needs to know about one element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemMetrics {
    /// Rendered height in pixels
    pub height: f64,

    /// Already positioned by a settled pass
    pub complete: bool,

    /// Hidden elements take no part in the layout
    pub displayed: bool,
}

impl ItemMetrics {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            complete: false,
            displayed: true,
        }
    }
}

/// Input for a single pass
#[derive(Clone, Copy, Debug)]
pub struct LayoutPass<'a> {
    pub container_width: f64,
    pub options: ResolvedOptions,
    pub task: RecalculationTask,
    /// Every element in the container, in document order
    pub items: &'a [ItemMetrics],
}

/// Result of a pass
#[derive(Clone, Debug, PartialEq)]
pub struct PassOutcome {
    /// (index into `LayoutPass::items`, placement) for each element this pass positioned
    pub placements: Vec<(usize, Placement)>,

    /// Height the container must take to enclose every column
    pub container_height: f64,

    /// Whether the pass ran with full scope (requested or promoted)
    pub full: bool,
}

/// Column heights as of the last settled pass, restored by the next incremental pass
#[derive(Clone, Debug, PartialEq)]
struct Baseline {
    heights: Vec<f64>,
    cursor: usize,
}

/// Column state carried between passes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnState {
    heights: Vec<f64>,
    column_width: f64,
    container_width: f64,
    /// Next column for round-robin placement
    cursor: usize,
    baseline: Option<Baseline>,
    /// Number of elements the last pass saw
    managed: usize,
}

/// Width of one column: `(width - gap * (columns - 1)) / columns`
pub fn column_width(container_width: f64, columns: u32, gap: f64) -> Result<f64, ConfigurationError> {
    if columns < 1 {
        return Err(ConfigurationError::InvalidColumns(columns));
    }
    if !(container_width > 0.0) {
        return Err(ConfigurationError::NonPositiveWidth(container_width));
    }

    let columns = f64::from(columns);
    let width = (container_width - gap * (columns - 1.0)) / columns;
    if !(width > 0.0) {
        return Err(ConfigurationError::NonPositiveWidth(width));
    }
    Ok(width)
}

/// Lowest column index among the shortest columns
fn shortest_column(heights: &[f64]) -> usize {
    let mut best = 0;
    for (index, height) in heights.iter().enumerate().skip(1) {
        if *height < heights[best] {
            best = index;
        }
    }
    best
}

impl ColumnState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    pub fn column_count(&self) -> usize {
        self.heights.len()
    }

    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    /// Tallest column, which is also the container height
    pub fn max_height(&self) -> f64 {
        self.heights.iter().copied().fold(0.0, f64::max)
    }

    /// Forget everything; the next pass is full
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// An incremental pass cannot trust the stored heights if the geometry or
    /// the element set changed underneath it
    pub fn needs_full(&self, columns: usize, container_width: f64, item_count: usize) -> bool {
        self.heights.is_empty()
            || self.heights.len() != columns
            || self.container_width != container_width
            || item_count < self.managed
    }

    /// Run one pass and return the placements to apply
    pub fn run(&mut self, pass: LayoutPass<'_>) -> Result<PassOutcome, ConfigurationError> {
        let ResolvedOptions { columns, margin, true_order } = pass.options;
        let width = column_width(pass.container_width, columns, margin.x)?;
        let column_count = columns as usize;

        let full = pass.task.refresh || self.needs_full(column_count, pass.container_width, pass.items.len());
        if full {
            log::debug!(
                "full pass: {} columns of {:.2}px ({} elements)",
                column_count,
                width,
                pass.items.len()
            );
            self.heights = vec![0.0; column_count];
            self.cursor = 0;
            self.baseline = None;
        } else if let Some(baseline) = &self.baseline {
            // the previous pass was provisional; start again from the settled heights
            self.heights = baseline.heights.clone();
            self.cursor = baseline.cursor;
        }

        if !pass.task.loaded && self.baseline.is_none() {
            self.baseline = Some(Baseline {
                heights: self.heights.clone(),
                cursor: self.cursor,
            });
        }

        self.column_width = width;
        self.container_width = pass.container_width;
        self.managed = pass.items.len();

        let mut placements = Vec::new();
        for (index, item) in pass.items.iter().enumerate() {
            if !item.displayed || (!full && item.complete) {
                continue;
            }

            let column = if true_order {
                let column = self.cursor % column_count;
                self.cursor = (column + 1) % column_count;
                column
            } else {
                shortest_column(&self.heights)
            };

            let placement = Placement {
                column_index: column,
                top: self.heights[column],
                left: column as f64 * (width + margin.x),
                width,
            };

            let height = if item.height.is_finite() { item.height.max(0.0) } else { 0.0 };
            self.heights[column] += height + margin.y;
            placements.push((index, placement));
        }

        if pass.task.loaded {
            self.baseline = None;
        }

        Ok(PassOutcome {
            placements,
            container_height: self.max_height(),
            full,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Margin;

    fn options(columns: u32, margin: f64, true_order: bool) -> ResolvedOptions {
        ResolvedOptions {
            columns,
            margin: Margin::uniform(margin),
            true_order,
        }
    }

    fn items(heights: &[f64]) -> Vec<ItemMetrics> {
        heights.iter().map(|h| ItemMetrics::new(*h)).collect()
    }

    #[test]
    fn column_width_subtracts_gutters() {
        assert_eq!(column_width(1000.0, 4, 10.0), Ok(242.5));
        assert_eq!(column_width(300.0, 1, 10.0), Ok(300.0));
    }

    #[test]
    fn column_width_rejects_degenerate_geometry() {
        assert_eq!(column_width(1000.0, 0, 10.0), Err(ConfigurationError::InvalidColumns(0)));
        assert_eq!(column_width(0.0, 2, 10.0), Err(ConfigurationError::NonPositiveWidth(0.0)));
        assert!(matches!(
            column_width(20.0, 3, 10.0),
            Err(ConfigurationError::NonPositiveWidth(_))
        ));
    }

    #[test]
    fn shortest_column_breaks_ties_by_index() {
        assert_eq!(shortest_column(&[10.0, 5.0, 5.0]), 1);
        assert_eq!(shortest_column(&[0.0, 0.0]), 0);
    }

    #[test]
    fn greedy_pass_fills_shortest_column() {
        let mut state = ColumnState::new();
        let elements = items(&[50.0, 80.0, 30.0, 60.0, 40.0]);
        let outcome = state
            .run(LayoutPass {
                container_width: 1000.0,
                options: options(4, 10.0, false),
                task: RecalculationTask::full(),
                items: &elements,
            })
            .unwrap();

        let columns: Vec<usize> = outcome.placements.iter().map(|(_, p)| p.column_index).collect();
        assert_eq!(columns, vec![0, 1, 2, 3, 2]);

        let (_, last) = outcome.placements[4];
        assert_eq!(last.top, 40.0);
        assert_eq!(last.left, 2.0 * (242.5 + 10.0));
        assert_eq!(state.heights(), &[60.0, 90.0, 90.0, 70.0]);
        assert_eq!(outcome.container_height, 90.0);
    }

    #[test]
    fn true_order_is_round_robin() {
        let mut state = ColumnState::new();
        let elements = items(&[100.0, 10.0, 10.0, 10.0, 10.0]);
        let outcome = state
            .run(LayoutPass {
                container_width: 300.0,
                options: options(3, 0.0, true),
                task: RecalculationTask::full(),
                items: &elements,
            })
            .unwrap();

        let columns: Vec<usize> = outcome.placements.iter().map(|(_, p)| p.column_index).collect();
        assert_eq!(columns, vec![0, 1, 2, 0, 1]);
        // element 3 lands under the tall element even though column 1 is shorter
        assert_eq!(outcome.placements[3].1.top, 100.0);
    }

    #[test]
    fn provisional_pass_is_replayed_from_baseline() {
        let mut state = ColumnState::new();
        let settled = items(&[40.0, 40.0]);
        state
            .run(LayoutPass {
                container_width: 200.0,
                options: options(2, 0.0, false),
                task: RecalculationTask::full(),
                items: &settled,
            })
            .unwrap();

        let mut grown = settled.clone();
        for item in grown.iter_mut() {
            item.complete = true;
        }
        grown.push(ItemMetrics::new(10.0));

        // provisional pass, then the image settles at a different height
        state
            .run(LayoutPass {
                container_width: 200.0,
                options: options(2, 0.0, false),
                task: RecalculationTask::provisional(),
                items: &grown,
            })
            .unwrap();
        assert_eq!(state.heights(), &[50.0, 40.0]);

        grown[2].height = 30.0;
        let outcome = state
            .run(LayoutPass {
                container_width: 200.0,
                options: options(2, 0.0, false),
                task: RecalculationTask::default(),
                items: &grown,
            })
            .unwrap();

        assert!(!outcome.full);
        assert_eq!(outcome.placements.len(), 1);
        assert_eq!(outcome.placements[0].1.top, 40.0);
        assert_eq!(state.heights(), &[70.0, 40.0]);
    }

    #[test]
    fn incremental_pass_is_promoted_when_geometry_changes() {
        let mut state = ColumnState::new();
        let elements = items(&[10.0, 20.0]);
        let first = state
            .run(LayoutPass {
                container_width: 400.0,
                options: options(2, 0.0, false),
                task: RecalculationTask::default(),
                items: &elements,
            })
            .unwrap();
        // nothing to build on yet
        assert!(first.full);

        let second = state
            .run(LayoutPass {
                container_width: 400.0,
                options: options(3, 0.0, false),
                task: RecalculationTask::default(),
                items: &elements,
            })
            .unwrap();
        assert!(second.full);
        assert_eq!(state.column_count(), 3);
    }

    #[test]
    fn hidden_and_non_finite_elements() {
        let mut state = ColumnState::new();
        let mut elements = items(&[10.0, f64::NAN, 10.0]);
        elements[2].displayed = false;
        let outcome = state
            .run(LayoutPass {
                container_width: 100.0,
                options: options(1, 5.0, false),
                task: RecalculationTask::full(),
                items: &elements,
            })
            .unwrap();

        assert_eq!(outcome.placements.len(), 2);
        assert_eq!(outcome.placements[1].1.top, 15.0);
        assert_eq!(state.heights(), &[20.0]);
    }
}
