//! `Masonry` class exposed to page scripts
//!
//! ```js
//! const grid = new Masonry({ container: '#grid', columns: 4, margin: 10, breakAt: { 600: 2 } });
//! grid.on('recalculated', () => console.log('laid out'));
//! grid.recalculate(true);
//! ```
//!
//! A container that cannot be resolved, options that do not parse, or an
//! invalid column count or margin leave an inert instance whose methods do
//! nothing; the reason is logged when `debug` is set.

use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::api::helpers::{options_from_js, serialize, to_js_error};
use crate::controller::LayoutController;
use crate::dom::DomSurface;
use crate::error::{ConfigurationError, MasonryError};
use crate::events::{MasonryEvent, Subscriber};
use crate::models::MasonryOptions;
use crate::{wasm_error, wasm_info};

/// Column state snapshot returned by `columnState()`
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStateView {
    pub heights: Vec<f64>,
    pub column_width: f64,
}

/// Wrap a JS function as an event subscriber; it receives the event name
fn js_subscriber(callback: js_sys::Function) -> Subscriber {
    Rc::new(move |event: MasonryEvent| {
        callback
            .call1(&JsValue::NULL, &JsValue::from_str(event.qualified_name()))
            .map(|_| ())
            .map_err(|e| format!("{:?}", e))
    })
}

#[wasm_bindgen]
pub struct Masonry {
    inner: Option<Rc<LayoutController<DomSurface>>>,
}

#[wasm_bindgen]
impl Masonry {
    /// Create a layout from an options object. `container` may be a selector or an element.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<Masonry, JsValue> {
        let debug = debug_requested(&options);
        let (options, element) = match split_container(options) {
            Ok(split) => split,
            Err(err) => return Ok(Self::inert(debug, err)),
        };

        let surface = match element {
            Some(element) => Ok(DomSurface::new(element)),
            None => DomSurface::from_selector(options.container.as_deref().unwrap_or_default()),
        };

        let surface = match surface {
            Ok(surface) => surface,
            Err(err) => return Ok(Self::inert(options.debug, err)),
        };

        let debug = options.debug;
        match LayoutController::new(surface, options) {
            Ok(controller) => {
                wasm_info!("Masonry created");
                Ok(Masonry { inner: Some(controller) })
            }
            Err(MasonryError::Configuration(err)) => Ok(Self::inert(debug, err)),
            Err(err) => Err(to_js_error(err)),
        }
    }

    /// Whether the container was resolved and the layout is running
    #[wasm_bindgen(getter, js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }

    /// Recompute positions. `refresh` repositions every element; `loaded` marks them complete.
    pub fn recalculate(&self, refresh: Option<bool>, loaded: Option<bool>) -> Result<(), JsValue> {
        match &self.inner {
            Some(controller) => controller
                .recalculate(refresh.unwrap_or(false), loaded.unwrap_or(true))
                .map_err(to_js_error),
            None => Ok(()),
        }
    }

    #[wasm_bindgen(js_name = recalculateOnImageLoad)]
    pub fn recalculate_on_image_load(
        &self,
        wait_until_finish: Option<bool>,
        refresh: Option<bool>,
    ) -> Result<(), JsValue> {
        match &self.inner {
            Some(controller) => controller
                .recalculate_on_image_load(wait_until_finish.unwrap_or(false), refresh.unwrap_or(false))
                .map_err(to_js_error),
            None => Ok(()),
        }
    }

    #[wasm_bindgen(js_name = runOnImageLoad)]
    pub fn run_on_image_load(&self, callback: js_sys::Function, every_load: Option<bool>) -> Result<(), JsValue> {
        match &self.inner {
            Some(controller) => controller
                .run_on_image_load(js_subscriber(callback), every_load.unwrap_or(false))
                .map_err(to_js_error),
            None => Ok(()),
        }
    }

    /// Subscribe to `initialized`, `recalculated`, `image.load`, `image.complete` or `resize`
    pub fn on(&self, event: &str, callback: js_sys::Function) -> Result<(), JsValue> {
        let event: MasonryEvent = event.parse().map_err(|e: String| JsValue::from_str(&e))?;
        if let Some(controller) = &self.inner {
            controller.on(event, js_subscriber(callback));
        }
        Ok(())
    }

    /// Stop reacting to resizes and restore the container's original markup
    pub fn remove(&self) -> Result<(), JsValue> {
        match &self.inner {
            Some(controller) => controller.destroy().map_err(to_js_error),
            None => Ok(()),
        }
    }

    pub fn destroy(&self) -> Result<(), JsValue> {
        self.remove()
    }

    /// Rebind the resize listener and lay everything out again
    #[wasm_bindgen(js_name = reInit)]
    pub fn re_init(&self) -> Result<(), JsValue> {
        match &self.inner {
            Some(controller) => controller.reinit().map_err(to_js_error),
            None => Ok(()),
        }
    }

    #[wasm_bindgen(js_name = columnState)]
    pub fn column_state(&self) -> Result<JsValue, JsValue> {
        let view = match &self.inner {
            Some(controller) => {
                let state = controller.column_state();
                ColumnStateView {
                    heights: state.heights().to_vec(),
                    column_width: state.column_width(),
                }
            }
            None => ColumnStateView {
                heights: Vec::new(),
                column_width: 0.0,
            },
        };
        serialize(&view, "Failed to serialize column state")
    }
}

impl Masonry {
    fn inert(debug: bool, err: ConfigurationError) -> Self {
        if debug {
            wasm_error!("Error: {}", err);
        } else {
            log::debug!("masonry inactive: {}", err);
        }
        Masonry { inner: None }
    }
}

/// `debug` as given by the caller, readable even when the rest does not parse
fn debug_requested(options: &JsValue) -> bool {
    if !options.is_object() {
        return false;
    }
    js_sys::Reflect::get(options, &JsValue::from_str("debug"))
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

fn reflect_error(err: JsValue) -> ConfigurationError {
    ConfigurationError::InvalidOptions(format!("{:?}", err))
}

/// Pull an element-valued `container` out of the options before serde sees them
fn split_container(options: JsValue) -> Result<(MasonryOptions, Option<HtmlElement>), ConfigurationError> {
    if options.is_undefined() || options.is_null() {
        return Ok((MasonryOptions::default(), None));
    }
    if !options.is_object() {
        return Err(ConfigurationError::InvalidOptions("options must be an object".to_string()));
    }

    let key = JsValue::from_str("container");
    let container = js_sys::Reflect::get(&options, &key).map_err(reflect_error)?;
    let Some(element) = container.dyn_ref::<HtmlElement>().cloned() else {
        return Ok((options_from_js(options)?, None));
    };

    // shallow copy so the caller's object is left alone
    let copy = js_sys::Object::assign(&js_sys::Object::new(), options.unchecked_ref());
    js_sys::Reflect::delete_property(&copy, &key).map_err(reflect_error)?;
    Ok((options_from_js(copy.into())?, Some(element)))
}
