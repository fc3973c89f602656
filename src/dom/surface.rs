//! Container surface backed by the DOM
//!
//! Elements are the container's direct children. Positions are written as
//! inline styles and the completion flag as a data attribute, so `detach`
//! can restore the markup by dropping both.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlImageElement};

use super::images::{find_images, is_settled, on_settled};
use super::resize::DomResizeBinding;
use super::{dom_error, COMPLETE_ATTRIBUTE};
use crate::error::{CollaboratorError, ConfigurationError};
use crate::host::{ResizeBinding, Surface};
use crate::layout::ItemMetrics;
use crate::models::Placement;

fn px(value: f64) -> String {
    format!("{}px", value)
}

pub struct DomSurface {
    container: HtmlElement,
}

impl DomSurface {
    pub fn new(container: HtmlElement) -> Self {
        Self { container }
    }

    /// Resolve the container from a CSS selector
    pub fn from_selector(selector: &str) -> Result<Self, ConfigurationError> {
        let not_found = || ConfigurationError::ContainerNotFound(selector.to_string());
        if selector.trim().is_empty() {
            return Err(not_found());
        }

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(not_found)?;
        let element = document
            .query_selector(selector)
            .ok()
            .flatten()
            .ok_or_else(not_found)?;

        element
            .dyn_into::<HtmlElement>()
            .map(Self::new)
            .map_err(|_| not_found())
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    fn children(&self) -> Vec<HtmlElement> {
        let children = self.container.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn set_style(element: &HtmlElement, property: &str, value: &str) -> Result<(), CollaboratorError> {
        element
            .style()
            .set_property(property, value)
            .map_err(|e| dom_error(property, e))
    }
}

impl Surface for DomSurface {
    type Item = HtmlElement;
    type Image = HtmlImageElement;

    fn container_width(&self) -> f64 {
        f64::from(self.container.client_width())
    }

    fn items(&self) -> Result<Vec<HtmlElement>, CollaboratorError> {
        Ok(self.children())
    }

    fn metrics(&self, item: &HtmlElement) -> ItemMetrics {
        ItemMetrics {
            height: f64::from(item.client_height()),
            complete: item.get_attribute(COMPLETE_ATTRIBUTE).as_deref() == Some("1"),
            displayed: item.offset_parent().is_some(),
        }
    }

    fn set_width(&self, item: &HtmlElement, width: f64) -> Result<(), CollaboratorError> {
        Self::set_style(item, "width", &px(width))
    }

    fn place(&self, item: &HtmlElement, placement: &Placement) -> Result<(), CollaboratorError> {
        Self::set_style(item, "position", "absolute")?;
        Self::set_style(item, "top", &px(placement.top))?;
        Self::set_style(item, "left", &px(placement.left))?;
        Self::set_style(item, "width", &px(placement.width))
    }

    fn set_complete(&self, item: &HtmlElement, complete: bool) -> Result<(), CollaboratorError> {
        item.set_attribute(COMPLETE_ATTRIBUTE, if complete { "1" } else { "0" })
            .map_err(|e| dom_error(COMPLETE_ATTRIBUTE, e))
    }

    fn set_container_height(&self, height: f64) -> Result<(), CollaboratorError> {
        Self::set_style(&self.container, "height", &px(height))
    }

    fn attach(&self) -> Result<(), CollaboratorError> {
        Self::set_style(&self.container, "position", "relative")
    }

    fn detach(&self) -> Result<(), CollaboratorError> {
        for child in self.children() {
            child
                .remove_attribute(COMPLETE_ATTRIBUTE)
                .map_err(|e| dom_error(COMPLETE_ATTRIBUTE, e))?;
            child.remove_attribute("style").map_err(|e| dom_error("style", e))?;
        }
        self.container
            .remove_attribute("style")
            .map_err(|e| dom_error("style", e))
    }

    fn images(&self) -> Result<Vec<HtmlImageElement>, CollaboratorError> {
        find_images(&self.container)
    }

    fn image_ready(&self, image: &HtmlImageElement) -> bool {
        is_settled(image)
    }

    fn on_image_ready(&self, image: &HtmlImageElement, ready: Box<dyn FnOnce()>) -> Result<(), CollaboratorError> {
        on_settled(image, ready)
    }

    fn bind_resize(
        &self,
        delay_ms: u32,
        on_resize: Rc<dyn Fn()>,
    ) -> Result<Box<dyn ResizeBinding>, CollaboratorError> {
        Ok(Box::new(DomResizeBinding::bind(delay_ms, on_resize)?))
    }
}
