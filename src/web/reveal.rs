//! Scroll reveals: add a class the first time an element is seen

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::Document;

use super::dom;
use super::observer::Observer;
use crate::error::{FxError, describe_js};
use crate::reveal::OneShotReveal;
use crate::settings::RevealGroup;

pub struct RevealBinding {
    state: Rc<RefCell<OneShotReveal>>,
    _observer: Option<Observer>,
}

impl RevealBinding {
    /// Mark every element of `group` as pending and watch for its first
    /// intersection
    pub fn attach(document: &Document, group: &RevealGroup) -> Result<Self, FxError> {
        let elements = Rc::new(dom::query_all(document, &group.selector)?);
        let state = Rc::new(RefCell::new(OneShotReveal::new()));
        if elements.is_empty() {
            return Ok(Self {
                state,
                _observer: None,
            });
        }

        let observer = {
            let state = Rc::clone(&state);
            let elements = Rc::clone(&elements);
            let visible_class = group.visible_class.clone();
            Observer::new(group.threshold, group.root_margin_px, move |entry, observer| {
                let target = entry.target();
                let Some(index) = elements.iter().position(|el| *el == target) else { return };
                if state.borrow_mut().on_intersection(index, entry.is_intersecting()) {
                    if let Err(e) = target.class_list().add_1(&visible_class) {
                        log::debug!("Reveal failed: {}", describe_js(&e));
                    }
                    observer.unobserve(&target);
                }
            })?
        };

        for el in elements.iter() {
            el.class_list().add_1(&group.pending_class)?;
            state.borrow_mut().register();
            observer.observe(el);
        }

        log::debug!("Reveal {:?}: {} elements", group.selector, elements.len());

        Ok(Self {
            state,
            _observer: Some(observer),
        })
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    pub fn revealed(&self) -> usize {
        let state = self.state.borrow();
        (0..state.len()).filter(|&i| state.is_revealed(i)).count()
    }
}
