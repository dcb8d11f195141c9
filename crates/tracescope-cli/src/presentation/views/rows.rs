//! Line layout for one list row.
//!
//! The row height is decided by the engine; this module fills exactly that
//! many lines, padding or cutting as needed, so the list never drifts from
//! the offsets the viewport computed.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use tracescope_engine::{Item, RowSizing, SelectionState, Symbol};
use tracescope_types::{Event, StyleToken};

use crate::presentation::formatters::{
    depth_guides, detail_header, frame_label, heading_label, parse_ansi, style_from_tokens,
    symbol_label, timestamp_column, TIMESTAMP_WIDTH,
};

pub struct RowRenderer<'a> {
    sizing: &'a RowSizing,
    selection: &'a SelectionState,
}

impl<'a> RowRenderer<'a> {
    pub fn new(sizing: &'a RowSizing, selection: &'a SelectionState) -> Self {
        Self { sizing, selection }
    }

    pub fn lines(&self, item: &Item<'_>, selected: bool, height: u16) -> Vec<Line<'static>> {
        let height = usize::from(height);
        match item {
            Item::ThreadHeading {
                thread_id, style, ..
            } => fit(vec![heading_line(*thread_id, style)], height),
            Item::Event { event, .. } => {
                let body_height = usize::from(self.sizing.size_of(item, false)).min(height);
                let mut lines = fit(self.message_lines(event, selected), body_height);
                if selected {
                    lines.extend(fit(self.detail_lines(event), height - body_height));
                }
                fit(lines, height)
            }
        }
    }

    fn message_lines(&self, event: &Event, selected: bool) -> Vec<Line<'static>> {
        let base = style_from_tokens(&event.style);
        let guides = depth_guides(event.depth);
        let stamp_style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let blank_stamp = " ".repeat(TIMESTAMP_WIDTH);
        let filler = usize::from(self.sizing.line_height.saturating_sub(1));

        let mut lines = Vec::new();
        for (i, text) in event.message.split('\n').enumerate() {
            let stamp = if i == 0 {
                timestamp_column(event.timestamp)
            } else {
                blank_stamp.clone()
            };
            let mut spans = vec![
                Span::styled(stamp, stamp_style),
                Span::styled(guides.clone(), Style::default().fg(Color::DarkGray)),
            ];
            spans.extend(parse_ansi(text, base));
            lines.push(Line::from(spans));
            lines.extend(std::iter::repeat_n(Line::default(), filler));
        }
        lines
    }

    fn detail_lines(&self, event: &Event) -> Vec<Line<'static>> {
        let indent = format!("{}{}", " ".repeat(TIMESTAMP_WIDTH), depth_guides(event.depth));
        let muted = Style::default().fg(Color::DarkGray);

        let mut lines = vec![Line::from(vec![
            Span::raw(indent.clone()),
            Span::styled(detail_header(event), muted.add_modifier(Modifier::ITALIC)),
        ])];

        if let Some(frames) = &event.backtrace {
            let symbols = self.selection.backtrace();
            let filler = usize::from(self.sizing.frame_height.saturating_sub(1));
            for (position, address) in frames.iter().enumerate() {
                let symbol = symbols.and_then(|s| s.get(position));
                lines.push(Line::from(vec![
                    Span::raw(indent.clone()),
                    Span::styled(frame_label(position, *address), muted),
                    Span::raw("  "),
                    symbol_span(symbol),
                ]));
                lines.extend(std::iter::repeat_n(Line::default(), filler));
            }
        } else if let Some(caller) = event.caller {
            lines.push(Line::from(vec![
                Span::raw(indent),
                Span::styled(format!("caller {}", caller), muted),
                Span::raw("  "),
                symbol_span(self.selection.caller()),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::raw(indent),
                Span::styled("no call site captured", muted),
            ]));
        }

        lines
    }
}

fn heading_line(thread_id: u64, style: &[StyleToken]) -> Line<'static> {
    Line::from(Span::styled(
        heading_label(thread_id),
        style_from_tokens(style).add_modifier(Modifier::BOLD),
    ))
}

fn symbol_span(symbol: Option<&Symbol>) -> Span<'static> {
    let style = match symbol {
        Some(Symbol::Resolved(_)) => Style::default().fg(Color::Cyan),
        Some(Symbol::Pending) => Style::default().fg(Color::DarkGray),
        Some(Symbol::Unresolved) | None => Style::default().fg(Color::Red),
    };
    Span::styled(symbol_label(symbol).to_string(), style)
}

fn fit(mut lines: Vec<Line<'static>>, height: usize) -> Vec<Line<'static>> {
    lines.truncate(height);
    lines.resize(height, Line::default());
    lines
}
