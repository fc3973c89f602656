//! Error types for the masonry layout
//!
//! Configuration problems are reported once and make the controller degrade to a
//! no-op. Collaborator failures (element lookup, measurement, image readiness)
//! propagate to whoever triggered the operation.

use thiserror::Error;

/// Top-level error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MasonryError {
    /// Invalid or unusable configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A host collaborator failed
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),
}

/// Configuration problems detected at construction or at the start of a pass
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Column count below one (base options or a breakpoint)
    #[error("Invalid column count: {0} (must be at least 1)")]
    InvalidColumns(u32),

    /// The container selector did not resolve to an element
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// Negative or non-finite gap (base options or a breakpoint)
    #[error("Invalid margin: {0}px (must be a non-negative number)")]
    InvalidMargin(f64),

    /// Container too narrow to derive a column width
    #[error("Non-positive layout width: {0}px")]
    NonPositiveWidth(f64),

    /// Options could not be parsed
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Failures raised by host collaborators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollaboratorError {
    /// Element lookup failed
    #[error("Element lookup failed: {0}")]
    Lookup(String),

    /// Applying styles or reading geometry failed
    #[error("Element update failed: {0}")]
    Measure(String),

    /// Image readiness tracking failed
    #[error("Image readiness tracking failed: {0}")]
    Readiness(String),

    /// An event subscriber reported a failure
    #[error("Subscriber for '{event}' failed: {message}")]
    Subscriber { event: String, message: String },
}
