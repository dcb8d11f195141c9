use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use tracescope_engine::{ItemList, RowSizing, SelectionState, Window};

use super::rows::RowRenderer;

/// Renders the materialized window of the event list
///
/// Rows are placed at their computed offsets relative to the scroll
/// position; lines falling outside `area` (overscan, or a tall row cut by
/// the top edge) are skipped.
pub struct EventListView<'a> {
    window: &'a Window,
    items: &'a ItemList,
    rows: RowRenderer<'a>,
}

impl<'a> EventListView<'a> {
    pub fn new(
        window: &'a Window,
        items: &'a ItemList,
        sizing: &'a RowSizing,
        selection: &'a SelectionState,
    ) -> Self {
        Self {
            window,
            items,
            rows: RowRenderer::new(sizing, selection),
        }
    }
}

impl Widget for EventListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.items.is_empty() {
            buf.set_string(area.x, area.y, "No events yet", Style::default().fg(Color::DarkGray));
            return;
        }

        let scroll = i64::from(self.window.scroll_offset);
        for visible in &self.window.rows {
            let Some(item) = self.items.item(visible.row) else {
                continue;
            };

            let lines = self.rows.lines(&item, visible.selected, visible.height);
            for (i, line) in lines.iter().enumerate() {
                let y = i64::from(visible.top) + i as i64 - scroll;
                if y < 0 || y >= i64::from(area.height) {
                    continue;
                }
                buf.set_line(area.x, area.y + y as u16, line, area.width);
            }
        }
    }
}
