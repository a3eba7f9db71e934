//! WebAssembly bindings for JavaScript
//!
//! This module exposes the transformer through wasm-bindgen for use in
//! browsers and Node.js. Enable with the "wasm" feature flag.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// Rewrite atomic groups in a pattern
///
/// Throws the error message as a string on failure.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = transformAtomicGroups)]
pub fn transform_atomic_groups(pattern: &str) -> Result<String, JsValue> {
    crate::transform_atomic_groups(pattern).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Check whether a pattern contains an atomic group outside character classes
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = hasAtomicGroups)]
pub fn has_atomic_groups(pattern: &str) -> bool {
    crate::has_atomic_groups(pattern)
}

/// Check whether `needle` occurs unescaped outside character classes
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = existsUnescaped)]
pub fn exists_unescaped(pattern: &str, needle: &str) -> Result<bool, JsValue> {
    let needle = crate::Needle::new(needle).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(crate::exists_unescaped_in_default_context(pattern, &needle))
}

/// Initialize panic hook for better error messages in WASM
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}
