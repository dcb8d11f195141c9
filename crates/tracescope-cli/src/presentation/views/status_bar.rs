//! Status Bar View Component
//!
//! Renders the bottom line with event counts, tailing state and the last
//! status message.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

#[derive(Debug, Clone, Default)]
pub struct StatusBarModel {
    pub event_count: usize,
    pub selected: Option<usize>,
    pub pending_symbols: usize,
    pub following: bool,
    pub message: Option<String>,
}

pub struct StatusBarView<'a> {
    model: &'a StatusBarModel,
}

impl<'a> StatusBarView<'a> {
    pub fn new(model: &'a StatusBarModel) -> Self {
        Self { model }
    }
}

impl Widget for StatusBarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks =
            Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).split(area);

        let selected = match self.model.selected {
            Some(index) => format!("#{} ", index),
            None => "- ".to_string(),
        };
        let (tail, tail_color) = if self.model.following {
            ("following", Color::Green)
        } else {
            ("paused", Color::Yellow)
        };

        let mut spans = vec![
            Span::raw(format!("Events: {} ", self.model.event_count)),
            Span::raw("| Selected: "),
            Span::raw(selected),
            Span::raw("| "),
            Span::styled(tail, Style::default().fg(tail_color)),
        ];
        if self.model.pending_symbols > 0 {
            spans.push(Span::styled(
                format!(" | resolving {}", self.model.pending_symbols),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(message) = &self.model.message {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(message.as_str(), Style::default().fg(Color::Cyan)));
        }
        Paragraph::new(Line::from(spans)).render(chunks[0], buf);

        let key = Style::default().fg(Color::Yellow);
        let help = Line::from(vec![
            Span::styled("[q]", key),
            Span::raw("uit "),
            Span::styled("[j/k]", key),
            Span::raw("select "),
            Span::styled("[⏎]", key),
            Span::raw("detail "),
            Span::styled("[d]", key),
            Span::raw("isasm "),
            Span::styled("[g/G]", key),
            Span::raw("top/end"),
        ]);
        Paragraph::new(help).render(chunks[1], buf);
    }
}
