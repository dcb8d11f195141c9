/// Tail-follow policy for a growing log
///
/// Tailing stays on while the viewport sits within `threshold` rows of the
/// bottom. Scrolling up turns it off; scrolling back down turns it on again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Autoscroll {
    enabled: bool,
    threshold: u32,
}

impl Default for Autoscroll {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Autoscroll {
    pub fn new(threshold: u32) -> Self {
        Self {
            enabled: true,
            threshold,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Recompute from a scroll position notification.
    pub fn observe(&mut self, scroll_offset: u32, content_height: u32, viewport_height: u32) -> bool {
        let limit = i64::from(content_height) - i64::from(viewport_height) - i64::from(self.threshold);
        self.enabled = i64::from(scroll_offset) >= limit;
        self.enabled
    }
}
