//! Binds the autoplay policy to `<video>` elements

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Event, HtmlElement, HtmlVideoElement};

use super::dom;
use super::observer::Observer;
use crate::error::{FxError, describe_js};
use crate::settings::VideoSettings;
use crate::video::{VideoCommand, VideoController, VideoId, VideoWatch, is_near_viewport};

/// Pending retry timer for one video
#[derive(Debug, Clone, Copy, Default)]
struct RetrySlot {
    handle: Option<i32>,
    generation: u32,
}

/// State reachable from every JS callback
struct Shared {
    controller: RefCell<VideoController>,
    videos: Vec<HtmlVideoElement>,
    retries: RefCell<Vec<RetrySlot>>,
    /// One reusable timeout callback per video
    retry_callbacks: RefCell<Vec<Closure<dyn FnMut()>>>,
    settings: VideoSettings,
}

impl Shared {
    fn index_of(&self, target: &Element) -> Option<VideoId> {
        self.videos.iter().position(|video| {
            let el: &Element = video;
            el == target
        })
    }
}

/// Autoplay for every matched video. Dropping it disconnects the observer,
/// clears pending retries and detaches the `ended` listeners.
pub struct VideoAutoplay {
    shared: Rc<Shared>,
    observer: Option<Observer>,
    ended: Vec<Closure<dyn FnMut(Event)>>,
}

impl VideoAutoplay {
    pub fn attach(document: &Document, settings: &VideoSettings) -> Result<Self, FxError> {
        let videos: Vec<HtmlVideoElement> = dom::query_all(document, &settings.selector)?
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlVideoElement>().ok())
            .collect();
        let count = videos.len();

        let shared = Rc::new(Shared {
            controller: RefCell::new(VideoController::new(settings.retry)),
            videos,
            retries: RefCell::new(vec![RetrySlot::default(); count]),
            retry_callbacks: RefCell::new(Vec::with_capacity(count)),
            settings: settings.clone(),
        });

        if count == 0 {
            log::debug!("No videos match {:?}", settings.selector);
            return Ok(Self {
                shared,
                observer: None,
                ended: Vec::new(),
            });
        }

        {
            let mut callbacks = shared.retry_callbacks.borrow_mut();
            for id in 0..count {
                let weak = Rc::downgrade(&shared);
                callbacks.push(Closure::<dyn FnMut()>::new(move || fire_retry(&weak, id)));
            }
        }

        let observer = {
            let weak = Rc::downgrade(&shared);
            Observer::new(settings.threshold, settings.root_margin_px, move |entry, _| {
                let Some(shared) = weak.upgrade() else { return };
                let Some(id) = shared.index_of(&entry.target()) else { return };
                let intersecting = entry.is_intersecting();
                dispatch(&shared, id, |c| c.on_visibility(id, intersecting));
            })?
        };

        let viewport = dom::viewport()?;
        let mut ended = Vec::with_capacity(count);
        for (index, video) in shared.videos.iter().enumerate() {
            let near = is_near_viewport(&dom::element_rect(video), &viewport);
            let (id, commands) = shared.controller.borrow_mut().register(near);
            debug_assert_eq!(id, index);
            for command in commands {
                execute(&shared, id, command);
            }

            let weak = Rc::downgrade(&shared);
            let on_ended = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                if let Some(shared) = weak.upgrade() {
                    dispatch(&shared, id, |c| c.on_ended(id));
                }
            });
            video.add_event_listener_with_callback("ended", on_ended.as_ref().unchecked_ref())?;
            ended.push(on_ended);

            observer.observe(video);
        }

        log::info!("Watching {} videos", count);

        Ok(Self {
            shared,
            observer: Some(observer),
            ended,
        })
    }

    pub fn len(&self) -> usize {
        self.shared.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.videos.is_empty()
    }

    /// Current policy state of one video
    pub fn watch(&self, id: VideoId) -> Option<VideoWatch> {
        self.shared.controller.borrow().watch(id).copied()
    }
}

impl Drop for VideoAutoplay {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }

        let cancels = self.shared.controller.borrow_mut().shutdown();
        for (id, command) in cancels {
            execute(&self.shared, id, command);
        }

        for (video, on_ended) in self.shared.videos.iter().zip(&self.ended) {
            let _ = video
                .remove_event_listener_with_callback("ended", on_ended.as_ref().unchecked_ref());
        }
    }
}

/// Run a controller transition and carry out its commands. The controller
/// borrow ends before any command touches the DOM.
fn dispatch<F>(shared: &Rc<Shared>, id: VideoId, transition: F)
where
    F: FnOnce(&mut VideoController) -> Vec<VideoCommand>,
{
    let commands = transition(&mut shared.controller.borrow_mut());
    for command in commands {
        execute(shared, id, command);
    }
}

fn execute(shared: &Rc<Shared>, id: VideoId, command: VideoCommand) {
    let Some(video) = shared.videos.get(id) else { return };

    match command {
        VideoCommand::Prepare => prepare(video),
        VideoCommand::Play { generation } => start_play(shared, id, generation),
        VideoCommand::Restart { generation } => {
            video.set_current_time(0.0);
            start_play(shared, id, generation);
        }
        VideoCommand::Pause => {
            if let Err(e) = video.pause() {
                log::debug!("Video {}: pause failed: {}", id, describe_js(&e));
            }
        }
        VideoCommand::ScheduleRetry {
            delay_ms,
            generation,
        } => schedule_retry(shared, id, delay_ms, generation),
        VideoCommand::CancelRetry => cancel_retry(shared, id),
        VideoCommand::ShowIcons { playing } => show_icons(video, &shared.settings, playing),
    }
}

/// Attributes browsers require before they allow unattended playback
fn prepare(video: &HtmlVideoElement) {
    let _ = video.remove_attribute("controls");
    video.set_controls(false);
    video.set_preload("auto");
    let _ = video.set_attribute("playsinline", "");
    video.set_default_muted(true);
    video.set_muted(true);
}

fn start_play(shared: &Rc<Shared>, id: VideoId, generation: u32) {
    let Some(video) = shared.videos.get(id) else { return };

    // Synchronous failures are routed through the promise so every outcome
    // arrives asynchronously
    let promise = video
        .play()
        .unwrap_or_else(|err| js_sys::Promise::reject(&err));

    let shared = Rc::clone(shared);
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|err| FxError::PlaybackRejected(describe_js(&err)));
        if let Err(e) = &outcome {
            log::debug!("Video {}: {}", id, e);
        }
        dispatch(&shared, id, |c| c.on_play_settled(id, generation, outcome));
    });
}

fn schedule_retry(shared: &Rc<Shared>, id: VideoId, delay_ms: u32, generation: u32) {
    cancel_retry(shared, id);

    let Ok(window) = dom::window() else { return };
    let callbacks = shared.retry_callbacks.borrow();
    let Some(callback) = callbacks.get(id) else { return };

    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    match window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), delay)
    {
        Ok(handle) => {
            if let Some(slot) = shared.retries.borrow_mut().get_mut(id) {
                *slot = RetrySlot {
                    handle: Some(handle),
                    generation,
                };
            }
        }
        Err(e) => log::warn!("Video {}: could not schedule retry: {}", id, describe_js(&e)),
    }
}

fn cancel_retry(shared: &Rc<Shared>, id: VideoId) {
    let handle = shared
        .retries
        .borrow_mut()
        .get_mut(id)
        .and_then(|slot| slot.handle.take());
    if let (Some(handle), Ok(window)) = (handle, dom::window()) {
        window.clear_timeout_with_handle(handle);
    }
}

fn fire_retry(shared: &Weak<Shared>, id: VideoId) {
    let Some(shared) = shared.upgrade() else { return };
    let generation = {
        let mut retries = shared.retries.borrow_mut();
        let Some(slot) = retries.get_mut(id) else { return };
        slot.handle = None;
        slot.generation
    };
    dispatch(&shared, id, |c| c.on_retry_due(id, generation));
}

/// Toggle the pause/play icon pair inside the video's parent, if present
fn show_icons(video: &HtmlVideoElement, settings: &VideoSettings, playing: bool) {
    let Some(parent) = video.parent_element() else { return };
    let (pause, play) = if playing { ("block", "none") } else { ("none", "block") };
    set_display(&parent, &settings.pause_icon_selector, pause);
    set_display(&parent, &settings.play_icon_selector, play);
}

fn set_display(root: &Element, selector: &str, display: &str) {
    if let Ok(Some(el)) = root.query_selector(selector) {
        if let Some(el) = el.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property("display", display);
        }
    }
}
