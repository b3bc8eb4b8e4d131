//! Rendering boundary for particles
//!
//! The field never touches the DOM. A renderer receives placements and
//! glides by particle index; the browser implementation turns them into CSS
//! transforms so movement is composited on the GPU.

use glam::Vec2;

pub trait ParticleRenderer {
    /// Put a particle somewhere immediately (no transition)
    fn place(&mut self, index: usize, position: Vec2);
    /// Move a particle to `target` over `duration_ms` with the glide easing
    fn glide(&mut self, index: usize, target: Vec2, duration_ms: f64);
}

/// `transform` value for an immediate placement
pub fn place_css(position: Vec2) -> String {
    format!("translate({}px, {}px)", position.x, position.y)
}

/// `transform` value for a glide target (3D so it gets its own layer)
pub fn transform_css(target: Vec2) -> String {
    format!("translate3d({}px, {}px, 0)", target.x, target.y)
}

/// `transition` value for a glide
pub fn transition_css(duration_ms: f64, easing: [f32; 4]) -> String {
    let [x1, y1, x2, y2] = easing;
    format!(
        "transform {}ms cubic-bezier({}, {}, {}, {})",
        duration_ms.round(),
        x1,
        y1,
        x2,
        y2
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_values() {
        assert_eq!(place_css(Vec2::new(20.0, 35.5)), "translate(20px, 35.5px)");
        assert_eq!(
            transform_css(Vec2::new(180.0, 42.0)),
            "translate3d(180px, 42px, 0)"
        );
        assert_eq!(
            transition_css(6400.4, [0.4, 0.1, 0.2, 0.9]),
            "transform 6400ms cubic-bezier(0.4, 0.1, 0.2, 0.9)"
        );
    }
}
