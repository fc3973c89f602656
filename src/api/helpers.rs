//! Shared helpers for the JS-facing API
//!
//! Console macros for messages page authors should see even without a `log`
//! backend, plus conversions across the JS boundary.

use wasm_bindgen::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ConfigurationError, MasonryError};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn info(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

/// Log an info message with [Masonry] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

/// Log an error message with [Masonry] ❌ prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_error(&format!($($arg)*))
    };
}

pub fn log_info(msg: &str) {
    info(&format!("[Masonry] {}", msg));
}

pub fn log_error(msg: &str) {
    error(&format!("[Masonry] ❌ {}", msg));
}

/// Read options from a JS value; a shape serde rejects is a configuration problem
pub fn options_from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, ConfigurationError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| ConfigurationError::InvalidOptions(e.to_string()))
}

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        JsValue::from_str(&msg)
    })
}

/// Convert a layout error to a JsValue
pub fn to_js_error(err: MasonryError) -> JsValue {
    let msg = err.to_string();
    log_error(&msg);
    JsValue::from_str(&msg)
}
