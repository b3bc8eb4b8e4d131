//! A single floating particle

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Motion schedule of one particle. Timestamps are frame-clock milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Logical position (where the last glide ended)
    pub position: Vec2,
    /// Where the current glide started
    pub start: Vec2,
    /// Where the current glide ends
    pub target: Vec2,
    pub transition_ms: f64,
    pub last_update: f64,
    pub next_update: f64,
}

impl Particle {
    /// Particle resting at `at`, first move due after `delay_ms`
    pub fn new(at: Vec2, now: f64, delay_ms: f64) -> Self {
        Self {
            position: at,
            start: at,
            target: at,
            transition_ms: 0.0,
            last_update: now,
            next_update: now + delay_ms,
        }
    }

    #[inline]
    pub fn is_due(&self, now: f64) -> bool {
        now >= self.next_update
    }

    /// The previous glide is treated as finished: its target becomes the
    /// resting point for the next one
    pub fn settle(&mut self) {
        self.start = self.target;
        self.position = self.target;
    }

    /// Begin a glide to `target` lasting `duration_ms`
    pub fn glide_to(&mut self, target: Vec2, now: f64, duration_ms: f64) {
        self.target = target;
        self.transition_ms = duration_ms;
        self.last_update = now;
        self.next_update = now + duration_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_at_rest() {
        let p = Particle::new(Vec2::new(30.0, 40.0), 1000.0, 250.0);
        assert_eq!(p.position, p.target);
        assert_eq!(p.start, p.target);
        assert_eq!(p.next_update, 1250.0);
        assert!(!p.is_due(1249.9));
        assert!(p.is_due(1250.0));
    }

    #[test]
    fn test_settle_then_glide() {
        let mut p = Particle::new(Vec2::ZERO, 0.0, 0.0);
        p.glide_to(Vec2::new(10.0, 0.0), 0.0, 6000.0);
        assert_eq!(p.position, Vec2::ZERO);

        p.settle();
        assert_eq!(p.position, Vec2::new(10.0, 0.0));
        assert_eq!(p.start, Vec2::new(10.0, 0.0));

        p.glide_to(Vec2::new(10.0, 80.0), 6000.0, 6500.0);
        assert_eq!(p.last_update, 6000.0);
        assert_eq!(p.next_update, 12500.0);
    }
}
