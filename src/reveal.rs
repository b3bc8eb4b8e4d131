//! One-shot scroll reveals
//!
//! Each observed element flips to its visible state the first time it
//! intersects and is never touched again.

/// Reveal bookkeeping for one group of elements
#[derive(Debug, Clone, Default)]
pub struct OneShotReveal {
    revealed: Vec<bool>,
}

impl OneShotReveal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track another element; returns its index
    pub fn register(&mut self) -> usize {
        self.revealed.push(false);
        self.revealed.len() - 1
    }

    /// Returns true exactly once per element: on its first intersection.
    /// The caller then adds the visible class and stops observing.
    pub fn on_intersection(&mut self, index: usize, intersecting: bool) -> bool {
        match self.revealed.get_mut(index) {
            Some(done) if intersecting && !*done => {
                *done = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }

    /// Every tracked element has been revealed
    pub fn is_complete(&self) -> bool {
        self.revealed.iter().all(|&r| r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveals_once() {
        let mut reveal = OneShotReveal::new();
        let a = reveal.register();
        let b = reveal.register();

        assert!(!reveal.on_intersection(a, false));
        assert!(reveal.on_intersection(a, true));
        assert!(!reveal.on_intersection(a, true));
        assert!(reveal.is_revealed(a));
        assert!(!reveal.is_complete());

        assert!(reveal.on_intersection(b, true));
        assert!(reveal.is_complete());
    }

    #[test]
    fn test_leaving_view_does_not_hide_again() {
        let mut reveal = OneShotReveal::new();
        let a = reveal.register();
        reveal.on_intersection(a, true);
        reveal.on_intersection(a, false);
        assert!(reveal.is_revealed(a));
    }

    #[test]
    fn test_unknown_index() {
        let mut reveal = OneShotReveal::new();
        assert!(!reveal.on_intersection(3, true));
        assert!(!reveal.is_revealed(3));
        assert!(reveal.is_empty());
    }
}
