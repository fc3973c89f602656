//! Image readiness detection
//!
//! An image counts as ready once it has loaded or failed to load; a broken
//! image must not hold the layout back forever.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlImageElement};

use crate::error::CollaboratorError;

/// `<img>` elements under `scope`, in document order
pub fn find_images(scope: &Element) -> Result<Vec<HtmlImageElement>, CollaboratorError> {
    let nodes = scope
        .query_selector_all("img")
        .map_err(|e| CollaboratorError::Lookup(format!("img lookup failed: {:?}", e)))?;

    let mut images = Vec::with_capacity(nodes.length() as usize);
    for index in 0..nodes.length() {
        if let Some(image) = nodes.item(index).and_then(|node| node.dyn_into::<HtmlImageElement>().ok()) {
            images.push(image);
        }
    }
    Ok(images)
}

/// Whether the browser is done with the image, successfully or not
pub fn is_settled(image: &HtmlImageElement) -> bool {
    image.complete()
}

const SETTLE_EVENTS: [&str; 2] = ["load", "error"];

/// Listeners waiting on one image, dropped together once either fires
struct Pending {
    image: HtmlImageElement,
    ready: Box<dyn FnOnce()>,
    listeners: Vec<(&'static str, Closure<dyn FnMut()>)>,
}

impl Pending {
    fn detach(&self) {
        for (event, listener) in &self.listeners {
            if let Err(e) = self
                .image
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove image {} listener: {:?}", event, e);
            }
        }
    }
}

/// Call `ready` once, on whichever of `load` / `error` fires first
pub fn on_settled(image: &HtmlImageElement, ready: Box<dyn FnOnce()>) -> Result<(), CollaboratorError> {
    let slot: Rc<RefCell<Option<Pending>>> = Rc::new(RefCell::new(None));

    let listeners = SETTLE_EVENTS
        .iter()
        .map(|event| {
            let slot = Rc::clone(&slot);
            let listener = Closure::wrap(Box::new(move || {
                let pending = slot.borrow_mut().take();
                if let Some(pending) = pending {
                    pending.detach();
                    let Pending { ready, listeners, .. } = pending;
                    ready();
                    // the running closure is freed by wasm-bindgen once it returns
                    drop(listeners);
                }
            }) as Box<dyn FnMut()>);
            (*event, listener)
        })
        .collect();

    *slot.borrow_mut() = Some(Pending {
        image: image.clone(),
        ready,
        listeners,
    });

    let added = {
        let pending = slot.borrow();
        pending.as_ref().map_or(Ok(()), |pending| {
            pending.listeners.iter().try_for_each(|(event, listener)| {
                image
                    .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
                    .map_err(|e| CollaboratorError::Readiness(format!("{} listener: {:?}", event, e)))
            })
        })
    };

    if let Err(err) = added {
        if let Some(pending) = slot.borrow_mut().take() {
            pending.detach();
        }
        return Err(err);
    }
    Ok(())
}
