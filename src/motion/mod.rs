//! Floating particle motion
//!
//! Pure and renderer-agnostic:
//! - Randomness comes from a [`MotionSampler`] (seeded `Pcg32` by default)
//! - Bounds are measured fresh for every move, never cached
//! - Visual output goes through a [`ParticleRenderer`]

pub mod bounds;
pub mod field;
pub mod particle;
pub mod render;
pub mod sampler;

pub use bounds::MotionBounds;
pub use field::{Move, ParticleField};
pub use particle::Particle;
pub use render::{ParticleRenderer, place_css, transform_css, transition_css};
pub use sampler::{MotionSampler, RandomSampler, Step};
