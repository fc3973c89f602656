//! Browser binding
//!
//! web-sys implementations of the host collaborators: the container surface,
//! image readiness listeners and the debounced window resize listener.

pub mod images;
pub mod resize;
pub mod surface;

pub use resize::DomResizeBinding;
pub use surface::DomSurface;

use wasm_bindgen::JsValue;

use crate::error::CollaboratorError;

/// Attribute marking an element as positioned by a settled pass
pub const COMPLETE_ATTRIBUTE: &str = "data-macy-complete";

/// Wrap a JS exception with what we were doing when it was thrown
pub(crate) fn dom_error(context: &str, err: JsValue) -> CollaboratorError {
    CollaboratorError::Measure(format!("{}: {:?}", context, err))
}
