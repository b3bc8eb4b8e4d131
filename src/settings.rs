//! Effect settings
//!
//! Read from an inline JSON block in the page
//! (`<script type="application/json" id="site-fx-config">`). Every field is
//! optional; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Inclusive numeric range used for random sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Span<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Swap the bounds if they were given the wrong way round
    pub fn ordered(self) -> Self {
        if self.max < self.min {
            Self {
                min: self.max,
                max: self.min,
            }
        } else {
            self
        }
    }
}

/// Floating particle background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub enabled: bool,
    pub count: usize,
    /// Distance from the container edges (px)
    pub margin: f32,
    /// Length of one random-walk step (px)
    pub step: Span<f32>,
    /// Duration of one glide (ms)
    pub glide_ms: Span<f64>,
    /// First moves are spread over `[0, stagger_ms)`
    pub stagger_ms: f64,
    /// cubic-bezier control points for the glide
    pub easing: [f32; 4],
    /// Preferred mount point; falls back to `<body>`
    pub hero_selector: String,
    pub container_class: String,
    pub particle_class: String,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            count: PARTICLE_COUNT,
            margin: PARTICLE_MARGIN,
            step: Span::new(MOVE_MIN, MOVE_MAX),
            glide_ms: Span::new(GLIDE_MIN_MS, GLIDE_MAX_MS),
            stagger_ms: STAGGER_MS,
            easing: GLIDE_EASING,
            hero_selector: ".hero".to_string(),
            container_class: "particles-container".to_string(),
            particle_class: "particle".to_string(),
        }
    }
}

/// How rejected `play()` calls are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Fixed backoff between attempts (ms)
    pub delay_ms: u32,
    /// Attempts per visibility episode; `None` retries until the video
    /// leaves the viewport
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay_ms: PLAY_RETRY_DELAY_MS,
            max_attempts: Some(PLAY_MAX_ATTEMPTS),
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt may follow `attempts` failed ones
    pub fn allows_retry(&self, attempts: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempts < max)
    }
}

/// Viewport-driven video autoplay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub enabled: bool,
    pub selector: String,
    pub threshold: f64,
    pub root_margin_px: u32,
    pub retry: RetryPolicy,
    /// Looked up inside the video's parent element
    pub pause_icon_selector: String,
    pub play_icon_selector: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".video__player, .features__video".to_string(),
            threshold: 0.0,
            root_margin_px: VIDEO_ROOT_MARGIN_PX,
            retry: RetryPolicy::default(),
            pause_icon_selector: ".pause-icon".to_string(),
            play_icon_selector: ".play-icon".to_string(),
        }
    }
}

/// One group of elements revealed on first scroll into view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealGroup {
    pub selector: String,
    /// Added up front (hidden state)
    pub pending_class: String,
    /// Added once the element intersects
    pub visible_class: String,
    pub threshold: f64,
    pub root_margin_px: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    pub enabled: bool,
    pub groups: Vec<RevealGroup>,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            groups: vec![
                RevealGroup {
                    selector: ".features__content, .team__description, .cta__title, .stats__text, .hero__title"
                        .to_string(),
                    pending_class: "fade-in".to_string(),
                    visible_class: "fade-in-visible".to_string(),
                    threshold: 0.15,
                    root_margin_px: 50,
                },
                RevealGroup {
                    selector: ".video__wrapper, .features__image".to_string(),
                    pending_class: "video-animation".to_string(),
                    visible_class: "video-visible".to_string(),
                    threshold: 0.3,
                    root_margin_px: 0,
                },
            ],
        }
    }
}

/// Percentage stat counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterSettings {
    pub enabled: bool,
    pub selector: String,
    pub prefix_selector: String,
    /// Class given to the recreated prefix span
    pub prefix_class: String,
    pub duration_ms: f64,
    pub frame_ms: f64,
    pub threshold: f64,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            selector: ".stats__number".to_string(),
            prefix_selector: ".stats__prefix".to_string(),
            prefix_class: "stats__prefix".to_string(),
            duration_ms: COUNTER_DURATION_MS,
            frame_ms: COUNTER_FRAME_MS,
            threshold: 0.5,
        }
    }
}

/// All effect settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub particles: ParticleSettings,
    pub video: VideoSettings,
    pub reveal: RevealSettings,
    pub counter: CounterSettings,
    /// Skip the particle background when the visitor asked for reduced motion
    pub respect_reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: ParticleSettings::default(),
            video: VideoSettings::default(),
            reveal: RevealSettings::default(),
            counter: CounterSettings::default(),
            respect_reduced_motion: true,
        }
    }
}

impl Settings {
    /// Id of the inline JSON config element
    pub const CONFIG_ELEMENT_ID: &'static str = "site-fx-config";

    /// Parse settings from JSON and sanitize them
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Clamp values into ranges the effects can work with
    pub fn sanitized(mut self) -> Self {
        let p = &mut self.particles;
        p.margin = p.margin.max(0.0);
        p.step = p.step.ordered();
        p.step.min = p.step.min.max(0.0);
        p.step.max = p.step.max.max(p.step.min);
        p.glide_ms = p.glide_ms.ordered();
        // A zero-length glide would reschedule a particle at the same instant
        p.glide_ms.min = p.glide_ms.min.max(1.0);
        p.glide_ms.max = p.glide_ms.max.max(p.glide_ms.min);
        p.stagger_ms = p.stagger_ms.max(0.0);

        self.video.threshold = self.video.threshold.clamp(0.0, 1.0);
        for group in &mut self.reveal.groups {
            group.threshold = group.threshold.clamp(0.0, 1.0);
        }

        let c = &mut self.counter;
        c.threshold = c.threshold.clamp(0.0, 1.0);
        c.frame_ms = c.frame_ms.max(1.0);
        c.duration_ms = c.duration_ms.max(c.frame_ms);
        self
    }

    /// Load settings from the page config block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::CONFIG_ELEMENT_ID);
                    return settings;
                }
                Err(e) => log::warn!("Ignoring invalid #{}: {}", Self::CONFIG_ELEMENT_ID, e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
