//! Count-up animation for percentage stats
//!
//! A stat like `viac ako 80%` counts from 0 to 80 over roughly two seconds
//! when it first scrolls into view. The step is fixed per frame, so slower
//! frame rates stretch the animation rather than skipping numbers.

/// First `<digits>%` in `text`
pub fn parse_percent(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    let mut start = None;

    for (i, &b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            start.get_or_insert(i);
            continue;
        }
        if let Some(s) = start.take() {
            if b == b'%' {
                // Out-of-range values fall through to the next candidate
                if let Ok(value) = text[s..i].parse() {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Text shown for a counter value
pub fn format_percent(value: u32) -> String {
    format!("{}%", value)
}

/// One animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterFrame {
    /// Intermediate value; keep animating
    Running(u32),
    /// Final value; stop
    Done(u32),
}

impl CounterFrame {
    pub fn value(&self) -> u32 {
        match *self {
            CounterFrame::Running(v) | CounterFrame::Done(v) => v,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, CounterFrame::Done(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    current: f64,
    target: u32,
    step: f64,
}

impl CounterAnimation {
    /// Count to `target` in steps sized for `duration_ms` at one step per
    /// `frame_ms`
    pub fn new(target: u32, duration_ms: f64, frame_ms: f64) -> Self {
        let duration_ms = duration_ms.max(1.0);
        Self {
            current: 0.0,
            target,
            step: target as f64 * frame_ms / duration_ms,
        }
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// Advance one frame
    pub fn advance(&mut self) -> CounterFrame {
        self.current += self.step;
        let target = self.target as f64;
        // A non-positive step would never reach the target
        if self.current < target && self.step > 0.0 {
            CounterFrame::Running(self.current.round() as u32)
        } else {
            CounterFrame::Done(self.target)
        }
    }
}
