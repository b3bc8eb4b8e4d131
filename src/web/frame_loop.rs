//! Cancellable `requestAnimationFrame` loop

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use super::dom;
use crate::error::FxError;

/// Calls a frame callback once per display refresh until stopped.
///
/// The callback returns `false` to end the loop on its own. Dropping the
/// loop cancels the pending frame.
pub struct FrameLoop {
    inner: Rc<LoopInner>,
}

struct LoopInner {
    /// Cleared by `stop`, including from inside the frame callback
    running: Cell<bool>,
    /// Pending animation-frame request
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl LoopInner {
    fn schedule(&self) -> Result<(), FxError> {
        let window = dom::window()?;
        let callback = self.callback.borrow();
        if let Some(callback) = callback.as_ref() {
            let handle = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
            self.handle.set(Some(handle));
        }
        Ok(())
    }
}

impl FrameLoop {
    pub fn new<F>(mut on_frame: F) -> Self
    where
        F: FnMut(f64) -> bool + 'static,
    {
        let inner = Rc::new(LoopInner {
            running: Cell::new(false),
            handle: Cell::new(None),
            callback: RefCell::new(None),
        });

        // Weak: the closure lives inside `inner`
        let weak = Rc::downgrade(&inner);
        let callback = Closure::<dyn FnMut(_)>::new(move |now: f64| {
            let Some(inner) = weak.upgrade() else { return };
            inner.handle.set(None);
            if !inner.running.get() {
                return;
            }
            let more = on_frame(now);
            if !more || !inner.running.get() {
                inner.running.set(false);
                return;
            }
            // Restarted from inside the callback
            if inner.handle.get().is_some() {
                return;
            }
            if let Err(e) = inner.schedule() {
                inner.running.set(false);
                log::warn!("Frame loop stopped: {}", e);
            }
        });
        *inner.callback.borrow_mut() = Some(callback);

        Self { inner }
    }

    /// Request the first frame. No-op when already running.
    pub fn start(&self) -> Result<(), FxError> {
        if self.is_running() {
            return Ok(());
        }
        self.inner.running.set(true);
        if let Err(e) = self.inner.schedule() {
            self.inner.running.set(false);
            return Err(e);
        }
        Ok(())
    }

    /// Cancel the pending frame
    pub fn stop(&self) {
        self.inner.running.set(false);
        if let Some(handle) = self.inner.handle.take() {
            if let Ok(window) = dom::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
