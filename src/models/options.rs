//! Layout configuration
//!
//! Options arrive as a plain JS object (or JSON on native hosts), are validated
//! once at construction, and are resolved against the current container width
//! at the start of every pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigurationError;

/// Gap between columns (`x`) and between stacked elements (`y`), in pixels
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(from = "MarginRepr")]
pub struct Margin {
    pub x: f64,
    pub y: f64,
}

impl Margin {
    pub fn uniform(value: f64) -> Self {
        Self { x: value, y: value }
    }
}

impl Margin {
    fn validate(&self) -> Result<(), ConfigurationError> {
        for gap in [self.x, self.y] {
            if !gap.is_finite() || gap < 0.0 {
                return Err(ConfigurationError::InvalidMargin(gap));
            }
        }
        Ok(())
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(2.0)
    }
}

/// Accepted spellings: `margin: 10` or `margin: { x: 10, y: 16 }`
#[derive(Deserialize)]
#[serde(untagged)]
enum MarginRepr {
    Uniform(f64),
    Axes {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
}

impl From<MarginRepr> for Margin {
    fn from(repr: MarginRepr) -> Self {
        match repr {
            MarginRepr::Uniform(value) => Margin::uniform(value),
            MarginRepr::Axes { x, y } => Margin { x, y },
        }
    }
}

/// Partial options applied below a width threshold
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(from = "BreakpointRepr")]
pub struct BreakpointOverride {
    pub columns: Option<u32>,
    pub margin: Option<Margin>,
}

/// `breakAt: { 600: 2 }` is shorthand for `breakAt: { 600: { columns: 2 } }`
#[derive(Deserialize)]
#[serde(untagged)]
enum BreakpointRepr {
    Columns(u32),
    Partial {
        #[serde(default)]
        columns: Option<u32>,
        #[serde(default)]
        margin: Option<Margin>,
    },
}

impl From<BreakpointRepr> for BreakpointOverride {
    fn from(repr: BreakpointRepr) -> Self {
        match repr {
            BreakpointRepr::Columns(columns) => BreakpointOverride {
                columns: Some(columns),
                margin: None,
            },
            BreakpointRepr::Partial { columns, margin } => BreakpointOverride { columns, margin },
        }
    }
}

/// User-facing configuration (camelCase on the JS side)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MasonryOptions {
    /// CSS selector of the container; only meaningful to the browser binding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,

    /// Base column count
    pub columns: u32,

    /// Gap between columns and rows
    pub margin: Margin,

    /// Place elements round-robin in reading order instead of shortest-column-first
    pub true_order: bool,

    /// Hold the layout until every image has loaded
    pub wait_for_images: bool,

    /// Accepted for compatibility; only `use_own_image_loader` disables the loader
    pub use_image_loader: bool,

    /// The host drives image readiness itself; no loader is bound at construction
    pub use_own_image_loader: bool,

    /// Width threshold (px) → override, applied when the container is at most that wide
    #[serde(deserialize_with = "deserialize_break_at")]
    pub break_at: BTreeMap<u32, BreakpointOverride>,

    /// Surface configuration problems as errors instead of debug noise
    pub debug: bool,
}

impl Default for MasonryOptions {
    fn default() -> Self {
        Self {
            container: None,
            columns: 4,
            margin: Margin::default(),
            true_order: true,
            wait_for_images: false,
            use_image_loader: true,
            use_own_image_loader: false,
            break_at: BTreeMap::new(),
            debug: false,
        }
    }
}

/// Object keys are always strings in JS; accept them and parse to widths
fn deserialize_break_at<'de, D>(deserializer: D) -> Result<BTreeMap<u32, BreakpointOverride>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, BreakpointOverride> = BTreeMap::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            key.trim()
                .parse::<u32>()
                .map(|width| (width, value))
                .map_err(|_| serde::de::Error::custom(format!("invalid breakpoint width '{}'", key)))
        })
        .collect()
}

/// Options in effect for one pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedOptions {
    pub columns: u32,
    pub margin: Margin,
    pub true_order: bool,
}

impl MasonryOptions {
    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidOptions(e.to_string()))
    }

    /// Reject column counts below one and negative or non-finite margins, in
    /// the base options and every breakpoint
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.columns < 1 {
            return Err(ConfigurationError::InvalidColumns(self.columns));
        }
        self.margin.validate()?;
        for entry in self.break_at.values() {
            if let Some(columns) = entry.columns {
                if columns < 1 {
                    return Err(ConfigurationError::InvalidColumns(columns));
                }
            }
            if let Some(margin) = entry.margin {
                margin.validate()?;
            }
        }
        Ok(())
    }

    /// Resolve the options for a container of the given width.
    ///
    /// Every breakpoint at least as wide as the container matches. Matches are
    /// layered from the widest down, so the narrowest matching breakpoint wins
    /// for each field it sets.
    pub fn resolve(&self, width: f64) -> ResolvedOptions {
        let mut resolved = ResolvedOptions {
            columns: self.columns,
            margin: self.margin,
            true_order: self.true_order,
        };

        for (_, entry) in self
            .break_at
            .iter()
            .rev()
            .filter(|(threshold, _)| width <= f64::from(**threshold))
        {
            if let Some(columns) = entry.columns {
                resolved.columns = columns;
            }
            if let Some(margin) = entry.margin {
                resolved.margin = margin;
            }
        }

        resolved
    }
}
