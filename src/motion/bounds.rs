//! Region particles are allowed to occupy

use glam::Vec2;

/// Axis-aligned box inside the container, inset by the margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl MotionBounds {
    /// Bounds for a container of `size`, inset by `margin` on every side.
    ///
    /// Containers smaller than `2 * margin` (including zero-size ones that
    /// have not been laid out yet) collapse to a single point at `margin`.
    pub fn from_container(size: Vec2, margin: f32) -> Self {
        let margin = margin.max(0.0);
        // NaN sizes (detached elements) behave like zero
        let size = Vec2::new(finite_or_zero(size.x), finite_or_zero(size.y));
        let min = Vec2::splat(margin);
        let max = Vec2::new((size.x - margin).max(margin), (size.y - margin).max(margin));
        Self { min, max }
    }

    /// Clamp a point into the bounds on both axes
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Width/height of the usable area
    #[inline]
    pub fn extent(&self) -> Vec2 {
        self.max - self.min
    }
}

#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}
