use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;
use tracescope_types::StyleToken;

/// Map an event's style tokens onto a terminal style.
///
/// Tokens are colour names (`"green"`, `"lightblue"`, `"#ff8800"`, an
/// index such as `"208"`) or modifiers. The first colour is the foreground,
/// a colour prefixed with `bg:` sets the background. Unknown tokens are
/// ignored.
pub fn style_from_tokens(tokens: &[StyleToken]) -> Style {
    let mut style = Style::default();
    let mut has_fg = false;

    for token in tokens {
        let token = token.as_str().trim();
        if let Some(modifier) = modifier(token) {
            style = style.add_modifier(modifier);
        } else if let Some(bg) = token.strip_prefix("bg:") {
            if let Ok(color) = Color::from_str(bg) {
                style = style.bg(color);
            }
        } else if !has_fg && let Ok(color) = Color::from_str(token) {
            style = style.fg(color);
            has_fg = true;
        }
    }

    style
}

fn modifier(token: &str) -> Option<Modifier> {
    match token {
        "bold" => Some(Modifier::BOLD),
        "dim" => Some(Modifier::DIM),
        "italic" => Some(Modifier::ITALIC),
        "underline" | "underlined" => Some(Modifier::UNDERLINED),
        "reverse" | "reversed" => Some(Modifier::REVERSED),
        _ => None,
    }
}
