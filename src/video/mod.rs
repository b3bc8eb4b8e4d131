//! Viewport-driven video autoplay
//!
//! Videos play while (nearly) visible and pause otherwise. Rejected
//! `play()` calls are retried on a fixed backoff until they succeed, the
//! retry budget runs out, or the video leaves the viewport.

pub mod controller;
pub mod viewport;

pub use controller::{VideoCommand, VideoController, VideoId, VideoWatch};
pub use viewport::{ElementRect, Viewport, is_near_viewport};
