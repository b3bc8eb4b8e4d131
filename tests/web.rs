#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement};

use site_fx::settings::{CounterSettings, ParticleSettings, RevealGroup, VideoSettings};
use site_fx::web::{FrameLoop, ParticleAnimation, RevealBinding, StatCounters, VideoAutoplay};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Fresh scratch element appended to <body>
fn scratch(tag: &str, class: &str) -> HtmlElement {
    let doc = document();
    let el: HtmlElement = doc.create_element(tag).unwrap().unchecked_into();
    el.set_class_name(class);
    doc.body().unwrap().append_child(&el).unwrap();
    el
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn particles_mount_in_hero_and_unmount_on_drop() {
    let hero = scratch("section", "hero-under-test");
    hero.style().set_property("width", "400px").unwrap();
    hero.style().set_property("height", "300px").unwrap();

    let settings = ParticleSettings {
        count: 4,
        hero_selector: ".hero-under-test".to_string(),
        ..ParticleSettings::default()
    };
    let animation = ParticleAnimation::mount(&document(), &settings, 1).unwrap();

    assert_eq!(hero.style().get_property_value("position").unwrap(), "relative");
    assert_eq!(animation.container().child_element_count(), 4);
    assert!(animation.particles().iter().all(|p| {
        p.position.x >= 20.0 && p.position.x <= 380.0 && p.position.y >= 20.0 && p.position.y <= 280.0
    }));

    drop(animation);
    assert_eq!(hero.child_element_count(), 0);
    hero.remove();
}

#[wasm_bindgen_test]
fn particles_fall_back_to_body() {
    let settings = ParticleSettings {
        count: 2,
        hero_selector: ".no-such-hero".to_string(),
        ..ParticleSettings::default()
    };
    let animation = ParticleAnimation::mount(&document(), &settings, 2).unwrap();
    let parent = animation.container().parent_element().unwrap();
    assert_eq!(parent.tag_name(), "BODY");
}

#[wasm_bindgen_test(async)]
async fn frame_loop_stops() {
    let frames = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&frames);
    let frame_loop = FrameLoop::new(move |_| {
        counter.set(counter.get() + 1);
        true
    });

    frame_loop.start().unwrap();
    assert!(frame_loop.is_running());
    sleep(100).await;

    frame_loop.stop();
    assert!(!frame_loop.is_running());
    let seen = frames.get();
    sleep(100).await;
    assert_eq!(frames.get(), seen);
}

#[wasm_bindgen_test(async)]
async fn frame_loop_stopped_from_its_own_callback() {
    let frames = Rc::new(Cell::new(0u32));
    let slot: Rc<RefCell<Option<FrameLoop>>> = Rc::new(RefCell::new(None));

    let counter = Rc::clone(&frames);
    let own = Rc::clone(&slot);
    let frame_loop = FrameLoop::new(move |_| {
        counter.set(counter.get() + 1);
        if let Some(frame_loop) = own.borrow().as_ref() {
            frame_loop.stop();
        }
        true
    });
    frame_loop.start().unwrap();
    *slot.borrow_mut() = Some(frame_loop);

    sleep(100).await;
    assert_eq!(frames.get(), 1);
    assert!(!slot.borrow().as_ref().unwrap().is_running());

    // Break the loop <-> closure cycle
    slot.borrow_mut().take();
}

#[wasm_bindgen_test]
fn empty_particle_field_never_runs() {
    let settings = ParticleSettings {
        count: 0,
        hero_selector: ".no-such-hero".to_string(),
        ..ParticleSettings::default()
    };
    let animation = ParticleAnimation::mount(&document(), &settings, 3).unwrap();
    animation.start().unwrap();
    assert!(!animation.is_running());
    assert!(animation.particles().is_empty());
}

#[wasm_bindgen_test]
fn reveal_marks_elements_pending() {
    let el = scratch("div", "reveal-under-test");
    let group = RevealGroup {
        selector: ".reveal-under-test".to_string(),
        pending_class: "fade-in".to_string(),
        visible_class: "fade-in-visible".to_string(),
        threshold: 0.15,
        root_margin_px: 50,
    };
    let binding = RevealBinding::attach(&document(), &group).unwrap();
    assert_eq!(binding.len(), 1);
    assert!(el.class_list().contains("fade-in"));
    el.remove();
}

#[wasm_bindgen_test]
fn counter_resets_to_zero_and_keeps_prefix() {
    let el = scratch("p", "stat-under-test");
    el.set_inner_html("<span class=\"stats__prefix\">viac ako</span> 80%");

    let settings = CounterSettings {
        selector: ".stat-under-test".to_string(),
        ..CounterSettings::default()
    };
    let counters = StatCounters::attach(&document(), &settings).unwrap();
    assert_eq!(counters.len(), 1);
    assert_eq!(el.get_attribute("data-target").as_deref(), Some("80"));
    assert_eq!(el.text_content().as_deref(), Some("viac ako 0%"));
    el.remove();
}

#[wasm_bindgen_test]
fn no_videos_is_a_no_op() {
    let settings = VideoSettings {
        selector: ".no-such-video".to_string(),
        ..VideoSettings::default()
    };
    let videos = VideoAutoplay::attach(&document(), &settings).unwrap();
    assert!(videos.is_empty());
}

#[wasm_bindgen_test]
fn video_is_prepared_for_autoplay() {
    let el = scratch("video", "video-under-test");
    el.set_attribute("controls", "").unwrap();

    let settings = VideoSettings {
        selector: ".video-under-test".to_string(),
        ..VideoSettings::default()
    };
    let videos = VideoAutoplay::attach(&document(), &settings).unwrap();
    assert_eq!(videos.len(), 1);

    let video: web_sys::HtmlVideoElement = el.clone().unchecked_into();
    assert!(!video.has_attribute("controls"));
    assert!(video.has_attribute("playsinline"));
    assert!(video.muted());
    assert_eq!(video.preload(), "auto");

    drop(videos);
    el.remove();
}
