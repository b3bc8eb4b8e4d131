//! Site FX - decorative motion for the marketing site
//!
//! Core modules:
//! - `motion`: Floating particle random walk (pure, seeded)
//! - `video`: Viewport-driven autoplay policy with retry
//! - `reveal`: One-shot scroll reveals
//! - `counter`: Count-up animation for percentage stats
//! - `settings`: Data-driven tunables
//! - `web`: DOM bindings (wasm32 only)

pub mod counter;
pub mod error;
pub mod motion;
pub mod reveal;
pub mod settings;
pub mod video;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::FxError;
pub use settings::Settings;

/// Default tunables
pub mod consts {
    /// Number of floating particles
    pub const PARTICLE_COUNT: usize = 25;
    /// Distance particles keep from the container edges (px)
    pub const PARTICLE_MARGIN: f32 = 20.0;
    /// Random walk step length (px)
    pub const MOVE_MIN: f32 = 60.0;
    pub const MOVE_MAX: f32 = 160.0;
    /// Duration of a single glide (ms)
    pub const GLIDE_MIN_MS: f64 = 6000.0;
    pub const GLIDE_MAX_MS: f64 = 7000.0;
    /// Upper bound on the first-move delay, keeps particles out of lockstep
    pub const STAGGER_MS: f64 = 2000.0;
    /// Glide timing curve (CSS cubic-bezier control points)
    pub const GLIDE_EASING: [f32; 4] = [0.4, 0.1, 0.2, 0.9];

    /// Delay before retrying a rejected play() (ms)
    pub const PLAY_RETRY_DELAY_MS: u32 = 50;
    /// Play attempts per visibility episode before giving up
    pub const PLAY_MAX_ATTEMPTS: u32 = 100;
    /// Videos start loading this far outside the viewport (px)
    pub const VIDEO_ROOT_MARGIN_PX: u32 = 100;

    /// Counter animation length and assumed frame interval (ms)
    pub const COUNTER_DURATION_MS: f64 = 2000.0;
    pub const COUNTER_FRAME_MS: f64 = 16.0;
}
