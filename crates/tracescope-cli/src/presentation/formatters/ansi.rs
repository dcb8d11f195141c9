//! ANSI escape handling for tracer messages.
//!
//! Handlers often colour their log lines with SGR sequences. The TUI turns
//! them into styled spans; plain output strips them.

use once_cell::sync::Lazy;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use regex::Regex;
use std::borrow::Cow;

static CSI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1b\[([0-9;?]*)([A-Za-z])").expect("valid CSI pattern")
});

pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    CSI.replace_all(text, "")
}

/// Split `text` into spans, starting from `base` and applying SGR codes.
/// Non-SGR control sequences are dropped.
pub fn parse_ansi(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut style = base;
    let mut cursor = 0;

    for captures in CSI.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.start() > cursor {
            spans.push(Span::styled(text[cursor..whole.start()].to_string(), style));
        }
        cursor = whole.end();

        if &captures[2] == "m" {
            style = apply_sgr(style, base, &captures[1]);
        }
    }

    if cursor < text.len() {
        spans.push(Span::styled(text[cursor..].to_string(), style));
    }
    spans
}

fn apply_sgr(mut style: Style, base: Style, params: &str) -> Style {
    let codes: Vec<u16> = if params.is_empty() {
        vec![0]
    } else {
        params.split(';').map(|p| p.parse().unwrap_or(0)).collect()
    };

    let mut iter = codes.into_iter();
    while let Some(code) = iter.next() {
        style = match code {
            0 => base,
            1 => style.add_modifier(Modifier::BOLD),
            2 => style.add_modifier(Modifier::DIM),
            3 => style.add_modifier(Modifier::ITALIC),
            4 => style.add_modifier(Modifier::UNDERLINED),
            7 => style.add_modifier(Modifier::REVERSED),
            22 => style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => style.remove_modifier(Modifier::ITALIC),
            24 => style.remove_modifier(Modifier::UNDERLINED),
            27 => style.remove_modifier(Modifier::REVERSED),
            30..=37 => style.fg(basic_color(code - 30)),
            39 => Style { fg: base.fg, ..style },
            40..=47 => style.bg(basic_color(code - 40)),
            49 => Style { bg: base.bg, ..style },
            90..=97 => style.fg(bright_color(code - 90)),
            100..=107 => style.bg(bright_color(code - 100)),
            38 | 48 => match extended_color(&mut iter) {
                Some(color) if code == 38 => style.fg(color),
                Some(color) => style.bg(color),
                None => style,
            },
            _ => style,
        };
    }
    style
}

fn extended_color(iter: &mut impl Iterator<Item = u16>) -> Option<Color> {
    match iter.next()? {
        5 => Some(Color::Indexed(u8::try_from(iter.next()?).ok()?)),
        2 => {
            let r = u8::try_from(iter.next()?).ok()?;
            let g = u8::try_from(iter.next()?).ok()?;
            let b = u8::try_from(iter.next()?).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

fn basic_color(index: u16) -> Color {
    match index {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        _ => Color::Gray,
    }
}

fn bright_color(index: u16) -> Color {
    match index {
        0 => Color::DarkGray,
        1 => Color::LightRed,
        2 => Color::LightGreen,
        3 => Color::LightYellow,
        4 => Color::LightBlue,
        5 => Color::LightMagenta,
        6 => Color::LightCyan,
        _ => Color::White,
    }
}
