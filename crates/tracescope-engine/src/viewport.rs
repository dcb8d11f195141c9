//! Virtualized event list.
//!
//! The viewport owns the item list, the selection and the offset table for
//! one mounted panel. Only rows intersecting the visible window (plus a
//! small overscan margin) are materialized; row heights come from
//! [`RowSizing`] and are cached as prefix sums until something invalidates
//! them. A selection change alters one row's height and therefore every
//! offset below it, so it invalidates the table from row 0.

use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracescope_types::{Event, TargetId};

use crate::autoscroll::Autoscroll;
use crate::error::{Error, Result};
use crate::items::ItemList;
use crate::offsets::OffsetTable;
use crate::selection::{ResolutionRequest, SelectionState};
use crate::sizing::RowSizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Extra rows materialized above and below the visible window
    pub overscan: usize,
    /// Slack, in rows, within which the view still counts as "at bottom"
    pub autoscroll_threshold: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            overscan: 2,
            autoscroll_threshold: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub row: usize,
    /// Offset of the row's top edge from the top of the content
    pub top: u32,
    pub height: u16,
    pub selected: bool,
}

/// Rows to render for the current scroll position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Window {
    pub scroll_offset: u32,
    pub viewport_height: u32,
    /// Rows intersecting the viewport, without overscan
    pub visible: Range<usize>,
    /// Materialized rows, including overscan
    pub rows: Vec<VisibleRow>,
}

impl Window {
    pub fn last_visible_row(&self) -> Option<usize> {
        if self.visible.is_empty() {
            None
        } else {
            Some(self.visible.end - 1)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub index: usize,
    pub target: TargetId,
    /// Symbolication to start for the new selection
    pub request: Option<ResolutionRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deactivation {
    pub index: usize,
    pub target: TargetId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggled {
    Activated(Activation),
    Deactivated(Deactivation),
}

/// Effect of replacing the event sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsChanged {
    pub rebuilt: bool,
    pub grew: bool,
    /// The view was pinned to the new bottom
    pub followed: bool,
    /// Selection dropped because its index no longer names the same event
    pub deselected: Option<Deactivation>,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    items: ItemList,
    sizing: RowSizing,
    offsets: OffsetTable,
    /// Total height with nothing selected, summed once per rebuild
    base_height: u32,
    selection: SelectionState,
    autoscroll: Autoscroll,
    scroll_offset: u32,
    viewport_height: u32,
    overscan: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(RowSizing::default(), ViewportConfig::default())
    }
}

impl Viewport {
    pub fn new(sizing: RowSizing, config: ViewportConfig) -> Self {
        Self {
            items: ItemList::default(),
            sizing,
            offsets: OffsetTable::new(),
            base_height: 0,
            selection: SelectionState::new(),
            autoscroll: Autoscroll::new(config.autoscroll_threshold),
            scroll_offset: 0,
            viewport_height: 0,
            overscan: config.overscan,
        }
    }

    pub fn items(&self) -> &ItemList {
        &self.items
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn autoscroll(&self) -> &Autoscroll {
        &self.autoscroll
    }

    pub fn sizing(&self) -> &RowSizing {
        &self.sizing
    }

    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Row of the selected event, if any
    pub fn selected_row(&self) -> Option<usize> {
        self.selection
            .selected()
            .and_then(|index| self.items.row_of_event(index))
    }

    /// Replace the event sequence and regroup it from scratch.
    pub fn set_events(&mut self, events: Arc<[Event]>) -> EventsChanged {
        if Arc::ptr_eq(self.items.events(), &events) {
            return EventsChanged::default();
        }

        let previous_rows = self.items.len();
        let deselected = self.revalidate_selection(&events);

        self.items = ItemList::build(events);
        self.offsets.invalidate_from(0);
        self.base_height = self
            .items
            .iter()
            .map(|item| u32::from(self.sizing.size_of(&item, false)))
            .fold(0, u32::saturating_add);

        let grew = self.items.len() > previous_rows;
        let followed = grew && self.autoscroll.enabled();
        if followed {
            self.scroll_to_bottom();
        } else {
            let max = self.max_scroll();
            if self.scroll_offset > max {
                self.scroll_to(max);
            }
        }

        EventsChanged {
            rebuilt: true,
            grew,
            followed,
            deselected,
        }
    }

    /// Keep the selection only if its index still names an identical event.
    fn revalidate_selection(&mut self, events: &[Event]) -> Option<Deactivation> {
        let index = self.selection.selected()?;
        let previous = self.items.events().get(index);
        if previous.is_some() && events.get(index) == previous {
            return None;
        }

        let target = previous.map(|event| event.target_id).unwrap_or_default();
        self.selection.clear();
        Some(Deactivation { index, target })
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        if height == self.viewport_height {
            return;
        }
        self.viewport_height = height;

        if self.autoscroll.enabled() {
            self.scroll_to_bottom();
        } else {
            let offset = self.scroll_offset;
            self.scroll_to(offset);
        }
    }

    /// Select an event, resetting its symbols and invalidating every offset.
    ///
    /// Returns `None` when the event is already selected.
    pub fn activate(&mut self, index: usize) -> Result<Option<Activation>> {
        if self.selection.selected() == Some(index) {
            return Ok(None);
        }
        self.select_event(index).map(Some)
    }

    fn select_event(&mut self, index: usize) -> Result<Activation> {
        let Some(event) = self.items.events().get(index) else {
            return Err(Error::SelectionOutOfRange {
                index,
                len: self.items.event_count(),
            });
        };

        let target = event.target_id;
        let request = self.selection.select(index, event);
        self.offsets.invalidate_from(0);

        if let Some(row) = self.items.row_of_event(index) {
            self.scroll_to_row(row);
        }

        Ok(Activation {
            index,
            target,
            request,
        })
    }

    /// Deselect `index`. Ignored unless it is the current selection.
    pub fn deactivate(&mut self, index: usize) -> Option<Deactivation> {
        if self.selection.selected() != Some(index) {
            return None;
        }

        self.selection.clear();
        self.offsets.invalidate_from(0);

        // The collapsed row may leave the view below the new content end
        let max = self.max_scroll();
        if self.scroll_offset > max {
            self.scroll_to(max);
        }

        let target = self
            .items
            .events()
            .get(index)
            .map(|event| event.target_id)
            .unwrap_or_default();
        Some(Deactivation { index, target })
    }

    pub fn clear_selection(&mut self) -> Option<Deactivation> {
        let index = self.selection.selected()?;
        self.deactivate(index)
    }

    /// Deactivate `index` if it is selected, activate it otherwise.
    pub fn toggle(&mut self, index: usize) -> Result<Toggled> {
        if let Some(deactivation) = self.deactivate(index) {
            return Ok(Toggled::Deactivated(deactivation));
        }
        self.select_event(index).map(Toggled::Activated)
    }

    pub fn select_next(&mut self) -> Result<Option<Activation>> {
        self.step_selection(1)
    }

    pub fn select_previous(&mut self) -> Result<Option<Activation>> {
        self.step_selection(-1)
    }

    fn step_selection(&mut self, step: isize) -> Result<Option<Activation>> {
        match self.neighbour(step) {
            Some(index) => self.activate(index),
            None => Ok(None),
        }
    }

    /// Event `step` events away from the selection, or the first/last
    /// visible event when nothing is selected.
    pub fn neighbour(&mut self, step: isize) -> Option<usize> {
        let count = self.items.event_count();
        if count == 0 {
            return None;
        }

        match self.selection.selected() {
            Some(current) => Some(current.saturating_add_signed(step).min(count - 1)),
            None => {
                let window = self.window();
                let row = if step >= 0 {
                    window.visible.start
                } else {
                    window.visible.end.saturating_sub(1)
                };
                self.items.event_at_row(row)
            }
        }
    }

    /// Total content height. Only the selected row differs from the
    /// unselected total, so nothing is measured here.
    pub fn content_height(&self) -> u32 {
        let expansion = self
            .selected_row()
            .and_then(|row| self.items.item(row))
            .map(|item| {
                u32::from(self.sizing.size_of(&item, true))
                    .saturating_sub(u32::from(self.sizing.size_of(&item, false)))
            })
            .unwrap_or(0);
        self.base_height.saturating_add(expansion)
    }

    pub fn max_scroll(&self) -> u32 {
        self.content_height().saturating_sub(self.viewport_height)
    }

    /// Move to `offset` (clamped) and report whether tailing is enabled.
    pub fn scroll_to(&mut self, offset: u32) -> bool {
        let content = self.content_height();
        let max = content.saturating_sub(self.viewport_height);
        self.scroll_offset = offset.min(max);
        self.autoscroll
            .observe(self.scroll_offset, content, self.viewport_height)
    }

    pub fn scroll_by(&mut self, delta: i64) -> bool {
        let target = (i64::from(self.scroll_offset) + delta).clamp(0, i64::from(u32::MAX));
        self.scroll_to(target as u32)
    }

    pub fn scroll_to_top(&mut self) -> bool {
        self.scroll_to(0)
    }

    pub fn scroll_to_bottom(&mut self) -> bool {
        let max = self.max_scroll();
        self.scroll_to(max)
    }

    /// Scroll just enough to bring `row` into view. Returns whether the
    /// view moved.
    pub fn scroll_to_row(&mut self, row: usize) -> bool {
        if row >= self.items.len() {
            return false;
        }
        self.measure(row + 1);

        let top = self.offsets.top(row);
        let bottom = self.offsets.bottom(row);
        let view_bottom = self.scroll_offset.saturating_add(self.viewport_height);
        if top >= self.scroll_offset && bottom <= view_bottom {
            return false;
        }

        let target = if top < self.scroll_offset || bottom - top >= self.viewport_height {
            top
        } else {
            bottom - self.viewport_height
        };
        self.scroll_to(target);
        true
    }

    /// Rows intersecting the viewport, without overscan
    pub fn visible_rows(&mut self) -> Range<usize> {
        self.window().visible
    }

    /// Rows to materialize for the current scroll position.
    pub fn window(&mut self) -> Window {
        let len = self.items.len();
        if len == 0 || self.viewport_height == 0 {
            return Window {
                scroll_offset: self.scroll_offset,
                viewport_height: self.viewport_height,
                ..Window::default()
            };
        }

        let first = self.row_at(self.scroll_offset).min(len);
        let view_end = self.scroll_offset.saturating_add(self.viewport_height);
        let visible_end = (self.row_at(view_end - 1) + 1).min(len);

        let start = first.saturating_sub(self.overscan);
        let end = visible_end.saturating_add(self.overscan).min(len);
        self.measure(end);

        let selected_row = self.selected_row();
        let rows = (start..end)
            .map(|row| VisibleRow {
                row,
                top: self.offsets.top(row),
                height: self.offsets.height(row).min(u32::from(u16::MAX)) as u16,
                selected: selected_row == Some(row),
            })
            .collect();

        Window {
            scroll_offset: self.scroll_offset,
            viewport_height: self.viewport_height,
            visible: first..visible_end,
            rows,
        }
    }

    fn measure(&mut self, count: usize) {
        let count = count.min(self.items.len());
        let selected_row = self.selected_row();
        let items = &self.items;
        let sizing = &self.sizing;
        self.offsets
            .ensure(count, |row| row_size(items, sizing, row, selected_row));
    }

    fn row_at(&mut self, offset: u32) -> usize {
        let len = self.items.len();
        let selected_row = self.selected_row();
        let items = &self.items;
        let sizing = &self.sizing;
        self.offsets
            .row_at(offset, len, |row| row_size(items, sizing, row, selected_row))
    }
}

fn row_size(items: &ItemList, sizing: &RowSizing, row: usize, selected_row: Option<usize>) -> u16 {
    items
        .item(row)
        .map(|item| sizing.size_of(&item, selected_row == Some(row)))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Symbol;
    use tracescope_testing::fixtures::EventBuilder;

    fn events(count: usize) -> Arc<[Event]> {
        (0..count)
            .map(|i| EventBuilder::new(1, &format!("event {}", i)).build())
            .collect::<Vec<_>>()
            .into()
    }

    fn viewport(height: u32) -> Viewport {
        let mut viewport = Viewport::new(
            RowSizing::default(),
            ViewportConfig {
                overscan: 1,
                autoscroll_threshold: 1,
            },
        );
        viewport.set_viewport_height(height);
        viewport
    }

    #[test]
    fn test_window_materializes_visible_rows_plus_overscan() {
        let mut viewport = viewport(5);
        viewport.set_events(events(50));
        viewport.scroll_to(10);

        let window = viewport.window();

        assert_eq!(window.visible, 10..15);
        let rows: Vec<usize> = window.rows.iter().map(|row| row.row).collect();
        assert_eq!(rows, (9..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_growth_follows_tail_when_enabled() {
        let mut viewport = viewport(5);
        viewport.set_events(events(10));

        let changed = viewport.set_events(events(11));

        assert!(changed.followed);
        let window = viewport.window();
        // 11 events + 1 heading
        assert_eq!(window.last_visible_row(), Some(11));
        assert_eq!(viewport.scroll_offset(), 7);
    }

    #[test]
    fn test_growth_does_not_move_view_after_scrolling_up() {
        let mut viewport = viewport(5);
        viewport.set_events(events(30));
        assert!(!viewport.scroll_to(3));

        let changed = viewport.set_events(events(31));

        assert!(changed.grew);
        assert!(!changed.followed);
        assert_eq!(viewport.scroll_offset(), 3);
    }

    #[test]
    fn test_same_reference_is_not_rebuilt() {
        let mut viewport = viewport(5);
        let shared = events(3);
        viewport.set_events(shared.clone());

        assert_eq!(viewport.set_events(shared), EventsChanged::default());
    }

    #[test]
    fn test_activation_grows_selected_row_and_shifts_offsets() {
        let mut viewport = viewport(20);
        let list: Arc<[Event]> = vec![
            EventBuilder::new(1, "a").build(),
            EventBuilder::new(1, "b").backtrace(&[1, 2, 3]).build(),
            EventBuilder::new(1, "c").build(),
        ]
        .into();
        viewport.set_events(list);
        assert_eq!(viewport.content_height(), 4);

        let activation = viewport.activate(1).unwrap().unwrap();

        assert_eq!(activation.index, 1);
        assert!(activation.request.is_some());
        // selected row: 1 line + detail 2 + 2 extra frames
        assert_eq!(viewport.content_height(), 8);
        let window = viewport.window();
        let selected = window.rows.iter().find(|row| row.selected).unwrap();
        assert_eq!((selected.row, selected.top, selected.height), (2, 2, 5));
        assert_eq!(window.rows[3].top, 7);

        viewport.deactivate(1).unwrap();
        assert_eq!(viewport.content_height(), 4);
    }

    #[test]
    fn test_activating_offscreen_event_scrolls_it_into_view() {
        let mut viewport = viewport(5);
        viewport.set_events(events(40));
        viewport.scroll_to_top();

        viewport.activate(30).unwrap();

        let window = viewport.window();
        let row = viewport.items().row_of_event(30).unwrap();
        assert!(window.visible.contains(&row));
    }

    #[test]
    fn test_activating_visible_event_keeps_scroll_position() {
        let mut viewport = viewport(10);
        viewport.set_events(events(40));
        viewport.scroll_to(4);

        viewport.activate(5).unwrap();

        assert_eq!(viewport.scroll_offset(), 4);
    }

    #[test]
    fn test_activate_out_of_range_is_rejected() {
        let mut viewport = viewport(5);
        viewport.set_events(events(2));

        assert_eq!(
            viewport.activate(7),
            Err(Error::SelectionOutOfRange { index: 7, len: 2 })
        );
        assert_eq!(viewport.selection().selected(), None);
    }

    #[test]
    fn test_deactivate_only_honours_current_selection() {
        let mut viewport = viewport(5);
        viewport.set_events(events(3));
        viewport.activate(1).unwrap();

        assert!(viewport.deactivate(2).is_none());
        assert_eq!(viewport.selection().selected(), Some(1));
        assert!(viewport.deactivate(1).is_some());
        assert_eq!(viewport.selection().selected(), None);
    }

    #[test]
    fn test_append_keeps_selection() {
        let mut viewport = viewport(5);
        viewport.set_events(events(3));
        viewport.activate(1).unwrap();

        let changed = viewport.set_events(events(4));

        assert!(changed.deselected.is_none());
        assert_eq!(viewport.selection().selected(), Some(1));
    }

    #[test]
    fn test_reshaped_sequence_clears_selection() {
        let mut viewport = viewport(5);
        viewport.set_events(events(3));
        viewport.activate(2).unwrap();

        let replacement: Arc<[Event]> = vec![
            EventBuilder::new(4, "other").build(),
            EventBuilder::new(4, "other").build(),
            EventBuilder::new(4, "other").build(),
        ]
        .into();
        let changed = viewport.set_events(replacement);

        assert_eq!(changed.deselected.map(|d| d.index), Some(2));
        assert_eq!(viewport.selection().selected(), None);
        assert!(viewport.selection().backtrace().is_none());
    }

    #[test]
    fn test_truncated_sequence_clears_selection_and_clamps_scroll() {
        let mut viewport = viewport(5);
        viewport.set_events(events(30));
        viewport.activate(25).unwrap();

        let changed = viewport.set_events(events(4));

        assert!(changed.deselected.is_some());
        assert_eq!(viewport.scroll_offset(), 0);
    }

    #[test]
    fn test_collapsing_selection_clamps_scroll_offset() {
        let mut viewport = viewport(5);
        let list: Arc<[Event]> = vec![
            EventBuilder::new(1, "a").build(),
            EventBuilder::new(1, "b").build(),
            EventBuilder::new(1, "c").backtrace(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).build(),
        ]
        .into();
        viewport.set_events(list);
        viewport.activate(2).unwrap();
        viewport.scroll_to_bottom();
        // heading + 2 rows + (1 line + detail 2 + 9 extra frames)
        assert_eq!(viewport.content_height(), 15);
        assert_eq!(viewport.scroll_offset(), 10);

        viewport.deactivate(2).unwrap();

        assert_eq!(viewport.content_height(), 4);
        assert_eq!(viewport.scroll_offset(), 0);
        let window = viewport.window();
        assert_eq!(window.visible, 0..4);
        assert_eq!(window.rows.len(), 4);
    }

    #[test]
    fn test_clear_selection_keeps_rows_on_screen() {
        let mut viewport = viewport(5);
        let list: Arc<[Event]> = vec![
            EventBuilder::new(1, "a").build(),
            EventBuilder::new(1, "b").backtrace(&[1, 2, 3, 4, 5, 6]).build(),
        ]
        .into();
        viewport.set_events(list);
        viewport.activate(1).unwrap();
        viewport.scroll_to_bottom();

        viewport.clear_selection().unwrap();

        assert!(viewport.scroll_offset() <= viewport.max_scroll());
        assert!(!viewport.window().rows.is_empty());
    }

    #[test]
    fn test_scrolling_measures_only_up_to_the_window() {
        let mut viewport = viewport(5);
        viewport.set_events(events(10_000));
        viewport.scroll_to_top();
        viewport.activate(3).unwrap();
        viewport.scroll_by(2);

        let window = viewport.window();

        let last = window.rows.last().map(|row| row.row).unwrap();
        assert!(viewport.offsets.measured() <= last + 1);
        // 10_000 events + 1 heading, plus the selected row's detail
        assert_eq!(viewport.content_height(), 10_003);
    }

    #[test]
    fn test_toggle_flips_selection() {
        let mut viewport = viewport(5);
        viewport.set_events(events(3));

        assert!(matches!(viewport.toggle(1), Ok(Toggled::Activated(_))));
        assert_eq!(viewport.selection().selected(), Some(1));
        assert!(matches!(viewport.toggle(1), Ok(Toggled::Deactivated(_))));
        assert_eq!(viewport.selection().selected(), None);
        assert_eq!(
            viewport.toggle(9),
            Err(Error::SelectionOutOfRange { index: 9, len: 3 })
        );
    }

    #[test]
    fn test_select_next_and_previous_stop_at_ends() {
        let mut viewport = viewport(5);
        viewport.set_events(events(2));

        viewport.select_next().unwrap();
        viewport.select_next().unwrap();
        assert_eq!(viewport.selection().selected(), Some(1));
        // already on the last event
        assert!(viewport.select_next().unwrap().is_none());

        viewport.select_previous().unwrap();
        assert_eq!(viewport.selection().selected(), Some(0));
    }

    #[test]
    fn test_visible_rows_track_scroll() {
        let mut viewport = viewport(4);
        viewport.set_events(events(20));
        viewport.scroll_to(6);

        assert_eq!(viewport.visible_rows(), 6..10);
    }

    #[test]
    fn test_neighbour_navigation() {
        let mut viewport = viewport(5);
        viewport.set_events(events(3));

        assert_eq!(viewport.neighbour(1), Some(0));
        viewport.activate(0).unwrap();
        assert_eq!(viewport.neighbour(1), Some(1));
        assert_eq!(viewport.neighbour(-1), Some(0));
        viewport.activate(2).unwrap();
        assert_eq!(viewport.neighbour(1), Some(2));
    }

    #[test]
    fn test_selection_resets_symbols_to_pending() {
        let mut viewport = viewport(5);
        let list: Arc<[Event]> = vec![EventBuilder::new(1, "x").caller(0x1000).build()].into();
        viewport.set_events(list);

        viewport.activate(0).unwrap();

        assert_eq!(viewport.selection().caller(), Some(&Symbol::Pending));
    }
}
