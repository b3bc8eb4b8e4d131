//! Browser bindings (wasm32 only)
//!
//! Everything here is glue: the decisions live in the pure modules, this
//! layer reads the DOM, feeds events in and writes results back out.

pub mod counter;
pub mod dom;
pub mod frame_loop;
pub mod observer;
pub mod particles;
pub mod reveal;
pub mod video;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::Event;

pub use counter::StatCounters;
pub use frame_loop::FrameLoop;
pub use observer::Observer;
pub use particles::ParticleAnimation;
pub use reveal::RevealBinding;
pub use video::VideoAutoplay;

use crate::error::FxError;
use crate::settings::Settings;

/// Every effect running on the page. Dropping it tears them all down.
pub struct SiteEffects {
    pub particles: Option<ParticleAnimation>,
    pub videos: Option<VideoAutoplay>,
    pub reveals: Vec<RevealBinding>,
    pub counters: Option<StatCounters>,
}

thread_local! {
    static EFFECTS: RefCell<Option<SiteEffects>> = const { RefCell::new(None) };
}

/// Start every enabled effect. A failing effect is logged and skipped.
pub fn boot(settings: &Settings) -> Result<SiteEffects, FxError> {
    let document = dom::document()?;

    let particles = if !settings.particles.enabled || settings.particles.count == 0 {
        None
    } else if settings.respect_reduced_motion && dom::prefers_reduced_motion() {
        log::info!("Reduced motion requested, particles disabled");
        None
    } else {
        let seed = js_sys::Date::now() as u64;
        skip_on_error(
            "Particles",
            ParticleAnimation::mount(&document, &settings.particles, seed).and_then(|p| {
                p.start()?;
                Ok(p)
            }),
        )
    };

    let videos = if settings.video.enabled {
        skip_on_error("Video autoplay", VideoAutoplay::attach(&document, &settings.video))
    } else {
        None
    };

    let reveals = if settings.reveal.enabled {
        settings
            .reveal
            .groups
            .iter()
            .filter_map(|group| skip_on_error("Reveal", RevealBinding::attach(&document, group)))
            .collect()
    } else {
        Vec::new()
    };

    let counters = if settings.counter.enabled {
        skip_on_error("Stat counters", StatCounters::attach(&document, &settings.counter))
    } else {
        None
    };

    Ok(SiteEffects {
        particles,
        videos,
        reveals,
        counters,
    })
}

fn skip_on_error<T>(what: &str, result: Result<T, FxError>) -> Option<T> {
    match result {
        Ok(effect) => Some(effect),
        Err(e) => {
            log::warn!("{} disabled: {}", what, e);
            None
        }
    }
}

/// Boot once the document is parsed and keep the effects alive for the
/// page's lifetime (or until [`teardown`])
pub fn install(settings: Settings) -> Result<(), FxError> {
    let document = dom::document()?;
    if document.ready_state() != "loading" {
        start(&settings);
        return Ok(());
    }

    let on_ready = Closure::once_into_js(move |_event: Event| start(&settings));
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    Ok(())
}

fn start(settings: &Settings) {
    match boot(settings) {
        Ok(effects) => {
            let previous = EFFECTS.with(|slot| slot.borrow_mut().replace(effects));
            if previous.is_some() {
                log::warn!("Effects booted twice, replacing the earlier set");
            }
            drop(previous);
            log::info!("Site effects running");
        }
        Err(e) => log::warn!("Site effects unavailable: {}", e),
    }
}

/// Stop loops, disconnect observers, clear timers and remove particles
pub fn teardown() {
    let effects = EFFECTS.with(|slot| slot.borrow_mut().take());
    if effects.is_some() {
        drop(effects);
        log::info!("Site effects torn down");
    }
}
