//! Site FX entry point
//!
//! On wasm32 this boots the page effects once the DOM is ready. Natively it
//! runs a short headless simulation of the particle field and the video
//! retry policy.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    // Err only when a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);

    log::info!("Site FX starting...");

    let settings = site_fx::Settings::load();
    if let Err(e) = site_fx::web::install(settings) {
        log::warn!("Site FX not installed: {}", e);
    }
}

/// Tear every effect down (exported for page scripts and hot reload)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn teardown() {
    site_fx::web::teardown();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Site FX (native) starting...");
    log::info!("Effects need a browser - run with `trunk serve` for the web version");

    let settings = site_fx::Settings::load();
    simulate_particles(&settings);
    simulate_video_retry(&settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Run the particle field for a simulated minute at 60 fps
#[cfg(not(target_arch = "wasm32"))]
fn simulate_particles(settings: &site_fx::Settings) {
    use glam::Vec2;
    use site_fx::motion::{MotionBounds, ParticleField, ParticleRenderer};

    struct CountingRenderer {
        glides: usize,
    }

    impl ParticleRenderer for CountingRenderer {
        fn place(&mut self, _index: usize, _position: Vec2) {}
        fn glide(&mut self, _index: usize, _target: Vec2, _duration_ms: f64) {
            self.glides += 1;
        }
    }

    let container = Vec2::new(1280.0, 720.0);
    let bounds = MotionBounds::from_container(container, settings.particles.margin);
    let mut field = ParticleField::from_settings(&settings.particles, 0x5eed, container, 0.0);
    let mut renderer = CountingRenderer { glides: 0 };

    let frame_ms = 1000.0 / 60.0;
    for frame in 0..3600 {
        field.advance(frame as f64 * frame_ms, || container, &mut renderer);
    }

    let escaped = field
        .particles()
        .iter()
        .filter(|p| !bounds.contains(p.target))
        .count();
    log::info!(
        "{} particles, {} glides in 60s, {} out of bounds",
        field.len(),
        renderer.glides,
        escaped
    );
    println!("✓ Particle field stays in bounds: {}", escaped == 0);
}

/// Autoplay rejected twice, then allowed
#[cfg(not(target_arch = "wasm32"))]
fn simulate_video_retry(settings: &site_fx::Settings) {
    use site_fx::FxError;
    use site_fx::video::{VideoCommand, VideoController};

    let mut controller = VideoController::new(settings.video.retry);
    let (id, commands) = controller.register(false);
    log::info!("register -> {:?}", commands);

    let mut pending = controller.on_visibility(id, true);
    let mut rejections = 2;
    while let Some(command) = pending.pop() {
        log::info!("command: {:?}", command);
        pending.extend(match command {
            VideoCommand::Play { generation } if rejections > 0 => {
                rejections -= 1;
                controller.on_play_settled(
                    id,
                    generation,
                    Err(FxError::PlaybackRejected("NotAllowedError".into())),
                )
            }
            VideoCommand::Play { generation } => controller.on_play_settled(id, generation, Ok(())),
            VideoCommand::ScheduleRetry { generation, .. } => controller.on_retry_due(id, generation),
            _ => Vec::new(),
        });
    }

    let playing = controller.watch(id).map(|w| w.playing).unwrap_or(false);
    println!("✓ Video plays after retries: {}", playing);
}
