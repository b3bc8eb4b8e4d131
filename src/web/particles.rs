//! Floating particles rendered as absolutely positioned divs

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use super::dom;
use super::frame_loop::FrameLoop;
use crate::error::FxError;
use crate::motion::{Particle, ParticleField, ParticleRenderer, place_css, transform_css, transition_css};
use crate::settings::ParticleSettings;

/// Writes particle moves into inline styles
pub struct DomParticleRenderer {
    elements: Vec<HtmlElement>,
    easing: [f32; 4],
}

impl ParticleRenderer for DomParticleRenderer {
    fn place(&mut self, index: usize, position: Vec2) {
        if let Some(el) = self.elements.get(index) {
            let _ = el.style().set_property("transform", &place_css(position));
        }
    }

    fn glide(&mut self, index: usize, target: Vec2, duration_ms: f64) {
        let Some(el) = self.elements.get(index) else { return };
        let style = el.style();
        let _ = style.set_property("transition", &transition_css(duration_ms, self.easing));

        // New transform goes in on the next frame so the new transition
        // is already in effect when it changes
        let transform = transform_css(target);
        let apply = Closure::once_into_js(move |_time: f64| {
            let _ = style.set_property("transform", &transform);
        });
        if let Ok(window) = dom::window() {
            let _ = window.request_animation_frame(apply.unchecked_ref());
        }
    }
}

/// Particle field mounted in the page and driven by its own frame loop
pub struct ParticleAnimation {
    field: Rc<RefCell<ParticleField>>,
    frame_loop: FrameLoop,
    container: HtmlElement,
}

impl ParticleAnimation {
    /// Create the particle elements inside the hero section (or `<body>`)
    /// and place them. Call [`start`](Self::start) to set them moving.
    pub fn mount(document: &Document, settings: &ParticleSettings, seed: u64) -> Result<Self, FxError> {
        let (root, mount_name) = match document.query_selector(&settings.hero_selector)? {
            Some(hero) => {
                // Hero must be the positioning context for the particles
                if let Some(hero) = hero.dyn_ref::<HtmlElement>() {
                    let style = hero.style();
                    if style.get_property_value("position")?.is_empty() {
                        style.set_property("position", "relative")?;
                    }
                }
                (hero, settings.hero_selector.as_str())
            }
            None => {
                let body = document.body().ok_or(FxError::NoDocument)?;
                (Element::from(body), "<body>")
            }
        };

        let container: HtmlElement = document.create_element("div")?.unchecked_into();
        container.set_class_name(&settings.container_class);
        root.append_child(&container)?;

        let mut elements = Vec::with_capacity(settings.count);
        for _ in 0..settings.count {
            let el: HtmlElement = document.create_element("div")?.unchecked_into();
            el.set_class_name(&settings.particle_class);
            container.append_child(&el)?;
            elements.push(el);
        }

        let field = ParticleField::from_settings(settings, seed, dom::element_size(&root), dom::now());
        let mut renderer = DomParticleRenderer {
            elements,
            easing: settings.easing,
        };
        field.place_all(&mut renderer);

        let field = Rc::new(RefCell::new(field));
        let frame_loop = {
            let field = Rc::clone(&field);
            FrameLoop::new(move |now| {
                let moved = field
                    .borrow_mut()
                    .advance(now, || dom::element_size(&root), &mut renderer);
                if moved > 0 {
                    log::trace!("{} particles retargeted", moved);
                }
                true
            })
        };

        log::info!("Mounted {} particles in {}", settings.count, mount_name);

        Ok(Self {
            field,
            frame_loop,
            container,
        })
    }

    /// Start the frame loop. An empty field has nothing to move, so it
    /// never requests a frame.
    pub fn start(&self) -> Result<(), FxError> {
        if self.field.borrow().is_empty() {
            log::debug!("No particles, frame loop not started");
            return Ok(());
        }
        self.frame_loop.start()
    }

    pub fn stop(&self) {
        self.frame_loop.stop();
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Snapshot of the motion state
    pub fn particles(&self) -> Vec<Particle> {
        self.field.borrow().particles().to_vec()
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }
}

impl Drop for ParticleAnimation {
    fn drop(&mut self) {
        self.frame_loop.stop();
        self.container.remove();
    }
}
