//! Error type for the DOM bindings
//!
//! Nothing here is ever shown to visitors. Setup failures are logged and the
//! affected effect is skipped; playback rejection feeds the retry policy.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FxError {
    /// No global `window` (not running in a browser)
    NoWindow,
    /// Window has no document
    NoDocument,
    /// A DOM call threw
    Js(String),
    /// `play()` was refused, usually by the autoplay policy
    PlaybackRejected(String),
}

impl fmt::Display for FxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FxError::NoWindow => write!(f, "no window"),
            FxError::NoDocument => write!(f, "no document"),
            FxError::Js(msg) => write!(f, "DOM call failed: {}", msg),
            FxError::PlaybackRejected(reason) => write!(f, "playback rejected: {}", reason),
        }
    }
}

impl std::error::Error for FxError {}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for FxError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        FxError::Js(describe_js(&value))
    }
}

/// Best-effort text for a thrown JS value
#[cfg(target_arch = "wasm32")]
pub fn describe_js(value: &wasm_bindgen::JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
