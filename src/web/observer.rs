//! Owned `IntersectionObserver`
//!
//! Keeps the JS callback alive for as long as the observer exists and
//! disconnects on drop, so effects can be torn down cleanly.

use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::FxError;

pub struct Observer {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Observer {
    /// Observer calling `on_entry` for every reported entry
    pub fn new<F>(threshold: f64, root_margin_px: u32, mut on_entry: F) -> Result<Self, FxError>
    where
        F: FnMut(&IntersectionObserverEntry, &IntersectionObserver) + 'static,
    {
        let callback = Closure::<dyn FnMut(_, _)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    on_entry(&entry, &observer);
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        options.set_root_margin(&format!("{}px", root_margin_px));

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, target: &Element) {
        self.observer.observe(target);
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
