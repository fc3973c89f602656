//! Debounced window resize listener
//!
//! Every `resize` event restarts a `setTimeout`; the callback only runs once the
//! window has been quiet for the whole delay. Releasing the binding removes the
//! listener and cancels a pending timeout.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use super::dom_error;
use crate::error::CollaboratorError;
use crate::host::ResizeBinding;

pub struct DomResizeBinding {
    window: Window,
    listener: Option<Closure<dyn FnMut()>>,
    timer: Rc<Cell<Option<i32>>>,
}

impl DomResizeBinding {
    pub fn bind(delay_ms: u32, on_resize: Rc<dyn Fn()>) -> Result<Self, CollaboratorError> {
        let window = web_sys::window()
            .ok_or_else(|| CollaboratorError::Lookup("no global window".to_string()))?;
        let timer: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

        let fire = {
            let timer = Rc::clone(&timer);
            Closure::wrap(Box::new(move || {
                timer.set(None);
                on_resize();
            }) as Box<dyn FnMut()>)
        };

        let listener = {
            let window = window.clone();
            let timer = Rc::clone(&timer);
            Closure::wrap(Box::new(move || {
                if let Some(handle) = timer.take() {
                    window.clear_timeout_with_handle(handle);
                }
                match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    fire.as_ref().unchecked_ref(),
                    delay_ms as i32,
                ) {
                    Ok(handle) => timer.set(Some(handle)),
                    Err(e) => log::warn!("resize debounce timer failed: {:?}", e),
                }
            }) as Box<dyn FnMut()>)
        };

        window
            .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
            .map_err(|e| dom_error("resize listener", e))?;

        Ok(Self {
            window,
            listener: Some(listener),
            timer,
        })
    }
}

impl ResizeBinding for DomResizeBinding {
    fn release(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.window.clear_timeout_with_handle(handle);
        }
        if let Some(listener) = self.listener.take() {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove resize listener: {:?}", e);
            }
        }
    }
}

impl Drop for DomResizeBinding {
    fn drop(&mut self) {
        self.release();
    }
}
