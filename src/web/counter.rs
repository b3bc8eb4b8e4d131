//! Percentage stats that count up when first scrolled into view

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Document, Element, Text};

use super::dom;
use super::frame_loop::FrameLoop;
use super::observer::Observer;
use crate::counter::{CounterAnimation, format_percent, parse_percent};
use crate::error::FxError;
use crate::reveal::OneShotReveal;
use crate::settings::CounterSettings;

struct StatTarget {
    element: Element,
    /// Text node holding the number (after the prefix span, if any)
    value: Text,
    has_prefix: bool,
    target: u32,
}

impl StatTarget {
    fn show(&self, value: u32) {
        let text = if self.has_prefix {
            format!(" {}", format_percent(value))
        } else {
            format_percent(value)
        };
        self.value.set_data(&text);
    }
}

pub struct StatCounters {
    targets: Rc<Vec<StatTarget>>,
    running: Rc<RefCell<Vec<FrameLoop>>>,
    _observer: Option<Observer>,
}

impl StatCounters {
    pub fn attach(document: &Document, settings: &CounterSettings) -> Result<Self, FxError> {
        let mut targets = Vec::new();
        for element in dom::query_all(document, &settings.selector)? {
            let text = element.text_content().unwrap_or_default();
            let Some(target) = parse_percent(&text) else { continue };
            let prefix = element
                .query_selector(&settings.prefix_selector)?
                .and_then(|p| p.text_content())
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty());

            element.set_attribute("data-target", &target.to_string())?;
            element.set_attribute("data-prefix", prefix.as_deref().unwrap_or(""))?;

            // Rebuild as `[<span class=prefix>prefix</span>] <value>%`
            element.set_text_content(None);
            if let Some(prefix) = &prefix {
                let span = document.create_element("span")?;
                span.set_class_name(&settings.prefix_class);
                span.set_text_content(Some(prefix.as_str()));
                element.append_child(&span)?;
            }
            let value = document.create_text_node("");
            element.append_child(&value)?;

            let stat = StatTarget {
                element,
                value,
                has_prefix: prefix.is_some(),
                target,
            };
            stat.show(0);
            targets.push(stat);
        }

        let targets = Rc::new(targets);
        let running = Rc::new(RefCell::new(Vec::new()));
        if targets.is_empty() {
            return Ok(Self {
                targets,
                running,
                _observer: None,
            });
        }

        let observer = {
            let targets = Rc::clone(&targets);
            let running = Rc::clone(&running);
            let mut seen = OneShotReveal::new();
            for _ in 0..targets.len() {
                seen.register();
            }
            let duration_ms = settings.duration_ms;
            let frame_ms = settings.frame_ms;

            Observer::new(settings.threshold, 0, move |entry, observer| {
                let element = entry.target();
                let Some(index) = targets.iter().position(|t| t.element == element) else {
                    return;
                };
                if !seen.on_intersection(index, entry.is_intersecting()) {
                    return;
                }
                observer.unobserve(&element);

                let targets = Rc::clone(&targets);
                let mut animation =
                    CounterAnimation::new(targets[index].target, duration_ms, frame_ms);
                let frame_loop = FrameLoop::new(move |_now| {
                    let frame = animation.advance();
                    targets[index].show(frame.value());
                    !frame.is_done()
                });
                match frame_loop.start() {
                    Ok(()) => running.borrow_mut().push(frame_loop),
                    Err(e) => log::debug!("Counter {} not animated: {}", index, e),
                }
            })?
        };

        for stat in targets.iter() {
            observer.observe(&stat.element);
        }

        log::debug!("Watching {} stat counters", targets.len());

        Ok(Self {
            targets,
            running,
            _observer: Some(observer),
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Counters still animating
    pub fn active(&self) -> usize {
        self.running
            .borrow()
            .iter()
            .filter(|l| l.is_running())
            .count()
    }
}

impl Drop for StatCounters {
    fn drop(&mut self) {
        for frame_loop in self.running.borrow().iter() {
            frame_loop.stop();
        }
    }
}
