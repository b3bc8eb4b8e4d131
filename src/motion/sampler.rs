//! Random inputs for the particle walk

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bounds::MotionBounds;
use crate::settings::{ParticleSettings, Span};

/// One random-walk step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Heading in radians, `[0, 2π)`
    pub angle: f32,
    /// Length in px
    pub distance: f32,
}

impl Step {
    /// Displacement vector for this step
    #[inline]
    pub fn offset(&self) -> Vec2 {
        Vec2::from_angle(self.angle) * self.distance
    }
}

/// Source of every random decision a [`super::ParticleField`] makes
pub trait MotionSampler {
    /// Uniform point inside `bounds`
    fn position(&mut self, bounds: &MotionBounds) -> Vec2;
    /// Delay before a particle's first move, `[0, stagger)`
    fn stagger_ms(&mut self) -> f64;
    /// Next random-walk step
    fn step(&mut self) -> Step;
    /// Length of the next glide
    fn glide_ms(&mut self) -> f64;
}

/// Default sampler: uniform draws from a seeded PCG stream
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: Pcg32,
    step: Span<f32>,
    glide_ms: Span<f64>,
    stagger_ms: f64,
}

impl RandomSampler {
    pub fn new(seed: u64, settings: &ParticleSettings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            step: settings.step,
            glide_ms: settings.glide_ms,
            stagger_ms: settings.stagger_ms,
        }
    }

    /// `min + u * (max - min)`, safe when `min == max`
    fn lerp32(&mut self, span: Span<f32>) -> f32 {
        span.min + self.rng.random::<f32>() * (span.max - span.min)
    }

    fn lerp64(&mut self, span: Span<f64>) -> f64 {
        span.min + self.rng.random::<f64>() * (span.max - span.min)
    }
}

impl MotionSampler for RandomSampler {
    fn position(&mut self, bounds: &MotionBounds) -> Vec2 {
        let x = self.lerp32(Span::new(bounds.min.x, bounds.max.x));
        let y = self.lerp32(Span::new(bounds.min.y, bounds.max.y));
        // f32 rounding can land a hair outside
        bounds.clamp(Vec2::new(x, y))
    }

    fn stagger_ms(&mut self) -> f64 {
        self.rng.random::<f64>() * self.stagger_ms
    }

    fn step(&mut self) -> Step {
        Step {
            // f32 rounding can produce exactly TAU
            angle: (self.rng.random::<f32>() * TAU) % TAU,
            distance: self.lerp32(self.step),
        }
    }

    fn glide_ms(&mut self) -> f64 {
        self.lerp64(self.glide_ms)
    }
}
