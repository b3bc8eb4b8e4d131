//! Construction-time viewport check
//!
//! Before the observer reports anything, a video counts as visible when each
//! of its edges is off-screen by at most one element dimension. This is
//! deliberately generous so videos just above or below the fold start early.

/// Element box in viewport coordinates (as from `getBoundingClientRect`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementRect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Visible viewport size (px)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

pub fn is_near_viewport(rect: &ElementRect, viewport: &Viewport) -> bool {
    rect.top >= -rect.height
        && rect.left >= -rect.width
        && rect.bottom() <= viewport.height + rect.height
        && rect.right() <= viewport.width + rect.width
}
