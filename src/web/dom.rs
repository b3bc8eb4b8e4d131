//! Small DOM helpers shared by the effects

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

use crate::error::FxError;
use crate::video::{ElementRect, Viewport};

pub fn window() -> Result<Window, FxError> {
    web_sys::window().ok_or(FxError::NoWindow)
}

pub fn document() -> Result<Document, FxError> {
    window()?.document().ok_or(FxError::NoDocument)
}

/// Frame clock in ms; same timeline as animation-frame timestamps
pub fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// All elements matching `selector`, in document order
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, FxError> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Rendered size of an element
pub fn element_size(element: &Element) -> Vec2 {
    let rect = element.get_bounding_client_rect();
    Vec2::new(rect.width() as f32, rect.height() as f32)
}

/// Element box in viewport coordinates
pub fn element_rect(element: &Element) -> ElementRect {
    let rect = element.get_bounding_client_rect();
    ElementRect {
        top: rect.top(),
        left: rect.left(),
        width: rect.width(),
        height: rect.height(),
    }
}

/// Window inner size, falling back to the root element's client size
pub fn viewport() -> Result<Viewport, FxError> {
    let window = window()?;
    let root = window.document().and_then(|d| d.document_element());
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .or_else(|| root.as_ref().map(|r| r.client_width() as f64))
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .or_else(|| root.as_ref().map(|r| r.client_height() as f64))
        .unwrap_or(0.0);
    Ok(Viewport { width, height })
}

/// `prefers-reduced-motion: reduce` is active
pub fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .map(|m| m.matches())
        .unwrap_or(false)
}
