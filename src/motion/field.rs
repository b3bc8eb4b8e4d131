//! The particle field: N particles on independent, staggered random walks

use glam::Vec2;

use super::bounds::MotionBounds;
use super::particle::Particle;
use super::render::ParticleRenderer;
use super::sampler::{MotionSampler, RandomSampler};
use crate::settings::ParticleSettings;

/// A glide started during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub index: usize,
    pub from: Vec2,
    pub target: Vec2,
    pub duration_ms: f64,
}

/// Fixed-size set of particles. Each particle only changes when its own
/// schedule comes due, so there is no global clock to coordinate.
#[derive(Debug, Clone)]
pub struct ParticleField<S = RandomSampler> {
    particles: Vec<Particle>,
    sampler: S,
    margin: f32,
}

impl ParticleField<RandomSampler> {
    /// Field seeded from `seed` using the configured ranges
    pub fn from_settings(settings: &ParticleSettings, seed: u64, container: Vec2, now: f64) -> Self {
        let sampler = RandomSampler::new(seed, settings);
        Self::new(settings.count, settings.margin, container, now, sampler)
    }
}

impl<S: MotionSampler> ParticleField<S> {
    /// Scatter `count` particles over the container and stagger their
    /// first moves
    pub fn new(count: usize, margin: f32, container: Vec2, now: f64, mut sampler: S) -> Self {
        let margin = margin.max(0.0);
        let bounds = MotionBounds::from_container(container, margin);
        let particles = (0..count)
            .map(|_| {
                let at = sampler.position(&bounds);
                let delay = sampler.stagger_ms();
                Particle::new(at, now, delay)
            })
            .collect();

        Self {
            particles,
            sampler,
            margin,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Advance every particle whose schedule is due at `now`.
    ///
    /// `measure` returns the current container size. It is called once per
    /// due particle (and not at all when nothing is due), so a resize between
    /// moves is picked up without caching.
    pub fn tick<F>(&mut self, now: f64, mut measure: F) -> Vec<Move>
    where
        F: FnMut() -> Vec2,
    {
        let mut moves = Vec::new();

        for (index, particle) in self.particles.iter_mut().enumerate() {
            if !particle.is_due(now) {
                continue;
            }

            particle.settle();

            let step = self.sampler.step();
            let bounds = MotionBounds::from_container(measure(), self.margin);
            let target = bounds.clamp(particle.position + step.offset());
            let duration_ms = self.sampler.glide_ms();

            particle.glide_to(target, now, duration_ms);
            moves.push(Move {
                index,
                from: particle.start,
                target,
                duration_ms,
            });
        }

        moves
    }

    /// Tick and hand the resulting glides to `renderer`. Returns the number
    /// of particles that started moving.
    pub fn advance<F, R>(&mut self, now: f64, measure: F, renderer: &mut R) -> usize
    where
        F: FnMut() -> Vec2,
        R: ParticleRenderer,
    {
        let moves = self.tick(now, measure);
        for m in &moves {
            renderer.glide(m.index, m.target, m.duration_ms);
        }
        moves.len()
    }

    /// Draw every particle at its resting position
    pub fn place_all<R: ParticleRenderer>(&self, renderer: &mut R) {
        for (index, particle) in self.particles.iter().enumerate() {
            renderer.place(index, particle.position);
        }
    }
}
