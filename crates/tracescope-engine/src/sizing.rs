use serde::{Deserialize, Serialize};

use crate::items::Item;

/// Row height model, in terminal rows
///
/// Heights depend only on message line count, selection and backtrace
/// frame count. Resolved symbol text never changes a row's height, so a
/// row can be sized before symbolication finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowSizing {
    pub heading_height: u16,
    pub event_base: u16,
    pub line_height: u16,
    /// Extra space after messages spanning more than one line
    pub multiline_padding: u16,
    /// Detail panel shown under the selected event
    pub detail_height: u16,
    /// One row per backtrace frame beyond the first
    pub frame_height: u16,
}

impl Default for RowSizing {
    fn default() -> Self {
        Self {
            heading_height: 1,
            event_base: 0,
            line_height: 1,
            multiline_padding: 1,
            detail_height: 2,
            frame_height: 1,
        }
    }
}

impl RowSizing {
    pub fn size_of(&self, item: &Item<'_>, is_selected: bool) -> u16 {
        let event = match item {
            Item::ThreadHeading { .. } => return self.heading_height,
            Item::Event { event, .. } => event,
        };

        let lines = event.message_lines() as u64;
        let mut height = u64::from(self.event_base) + lines * u64::from(self.line_height);
        if lines > 1 {
            height += u64::from(self.multiline_padding);
        }

        if is_selected {
            height += u64::from(self.detail_height);
            if let Some(frames) = event.frame_count() {
                height += frames.saturating_sub(1) as u64 * u64::from(self.frame_height);
            }
        }

        height.min(u64::from(u16::MAX)) as u16
    }
}
