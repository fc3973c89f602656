//! Host collaborators
//!
//! The controller never touches the page directly. Everything it needs from the
//! host (element lookup, measurement, style mutation, image readiness, the
//! debounced resize listener) goes through [`Surface`].

use std::rc::Rc;

use crate::error::CollaboratorError;
use crate::layout::ItemMetrics;
use crate::models::Placement;

/// A bound resize listener. Released exactly once, on destroy or rebind.
pub trait ResizeBinding {
    /// Stop delivering resize notifications, including any debounced one still pending
    fn release(&mut self);
}

/// The container and its elements, as seen by the controller
pub trait Surface {
    /// Handle to a managed element
    type Item;

    /// Handle to an image whose readiness is tracked
    type Image;

    /// Width available to the columns (px)
    fn container_width(&self) -> f64;

    /// Managed elements in document order
    fn items(&self) -> Result<Vec<Self::Item>, CollaboratorError>;

    /// Current height, completion flag and visibility of an element
    fn metrics(&self, item: &Self::Item) -> ItemMetrics;

    /// Apply the column width before the element is measured
    fn set_width(&self, item: &Self::Item, width: f64) -> Result<(), CollaboratorError>;

    /// Position the element absolutely inside the container
    fn place(&self, item: &Self::Item, placement: &Placement) -> Result<(), CollaboratorError>;

    fn set_complete(&self, item: &Self::Item, complete: bool) -> Result<(), CollaboratorError>;

    fn set_container_height(&self, height: f64) -> Result<(), CollaboratorError>;

    /// Make the container the positioning context for its elements
    fn attach(&self) -> Result<(), CollaboratorError>;

    /// Remove every style and flag the layout applied, to the container and its elements
    fn detach(&self) -> Result<(), CollaboratorError>;

    /// Images inside the container
    fn images(&self) -> Result<Vec<Self::Image>, CollaboratorError>;

    /// Whether the image has already settled (loaded or failed)
    fn image_ready(&self, image: &Self::Image) -> bool;

    /// Call `ready` once when the image settles
    fn on_image_ready(&self, image: &Self::Image, ready: Box<dyn FnOnce()>) -> Result<(), CollaboratorError>;

    /// Listen for viewport resizes; a burst of resizes within `delay_ms` of each
    /// other is delivered as one call to `on_resize`, `delay_ms` after the last one
    fn bind_resize(
        &self,
        delay_ms: u32,
        on_resize: Rc<dyn Fn()>,
    ) -> Result<Box<dyn ResizeBinding>, CollaboratorError>;
}
