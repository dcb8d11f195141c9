use owo_colors::OwoColorize;
use std::fmt;
use tracescope_engine::{Item, ItemList, SelectionState};
use tracescope_types::{Event, StyleToken};

use crate::presentation::formatters::{
    depth_guides, detail_header, frame_label, heading_label, strip_ansi, symbol_label,
    timestamp_column, TIMESTAMP_WIDTH,
};

#[derive(Debug, Clone, Copy)]
pub struct DumpOptions {
    pub enable_color: bool,
}

/// Plain-text rendering of the whole grouped list, with the detail of the
/// selected event expanded under it.
pub struct DumpView<'a> {
    pub items: &'a ItemList,
    pub selection: &'a SelectionState,
    pub options: DumpOptions,
}

impl fmt::Display for DumpView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.items.iter() {
            match item {
                Item::ThreadHeading {
                    thread_id, style, ..
                } => self.write_heading(f, thread_id, style)?,
                Item::Event {
                    source_index,
                    event,
                } => {
                    self.write_event(f, event)?;
                    if self.selection.selected() == Some(source_index) {
                        self.write_detail(f, event)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl DumpView<'_> {
    fn write_heading(
        &self,
        f: &mut fmt::Formatter<'_>,
        thread_id: u64,
        style: &[StyleToken],
    ) -> fmt::Result {
        let label = heading_label(thread_id);
        if self.options.enable_color {
            writeln!(f, "{}", label.color(ansi_color(style)).bold())
        } else {
            writeln!(f, "{}", label)
        }
    }

    fn write_event(&self, f: &mut fmt::Formatter<'_>, event: &Event) -> fmt::Result {
        let guides = depth_guides(event.depth);
        let blank = " ".repeat(TIMESTAMP_WIDTH);

        for (i, line) in event.message.split('\n').enumerate() {
            let stamp = if i == 0 {
                timestamp_column(event.timestamp)
            } else {
                blank.clone()
            };
            if self.options.enable_color {
                // Messages keep their own escapes on a terminal
                writeln!(f, "{}{}{}", stamp.bright_black(), guides.bright_black(), line)?;
            } else {
                writeln!(f, "{}{}{}", stamp, guides, strip_ansi(line))?;
            }
        }
        Ok(())
    }

    fn write_detail(&self, f: &mut fmt::Formatter<'_>, event: &Event) -> fmt::Result {
        let indent = format!("{}{}", " ".repeat(TIMESTAMP_WIDTH), depth_guides(event.depth));
        writeln!(f, "{}{}", indent, self.muted(&detail_header(event)))?;

        if let Some(frames) = &event.backtrace {
            let symbols = self.selection.backtrace();
            for (position, address) in frames.iter().enumerate() {
                let symbol = symbols.and_then(|s| s.get(position));
                writeln!(
                    f,
                    "{}{}  {}",
                    indent,
                    self.muted(&frame_label(position, *address)),
                    self.symbol(symbol_label(symbol))
                )?;
            }
        } else if let Some(caller) = event.caller {
            writeln!(
                f,
                "{}{}  {}",
                indent,
                self.muted(&format!("caller {}", caller)),
                self.symbol(symbol_label(self.selection.caller()))
            )?;
        } else {
            writeln!(f, "{}{}", indent, self.muted("no call site captured"))?;
        }
        Ok(())
    }

    fn muted(&self, text: &str) -> String {
        if self.options.enable_color {
            text.bright_black().to_string()
        } else {
            text.to_string()
        }
    }

    fn symbol(&self, text: &str) -> String {
        if self.options.enable_color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }
}

fn ansi_color(style: &[StyleToken]) -> owo_colors::AnsiColors {
    use owo_colors::AnsiColors;

    style
        .iter()
        .find_map(|token| match token.as_str() {
            "black" => Some(AnsiColors::Black),
            "red" => Some(AnsiColors::Red),
            "green" => Some(AnsiColors::Green),
            "yellow" => Some(AnsiColors::Yellow),
            "blue" => Some(AnsiColors::Blue),
            "magenta" => Some(AnsiColors::Magenta),
            "cyan" => Some(AnsiColors::Cyan),
            "white" => Some(AnsiColors::White),
            _ => None,
        })
        .unwrap_or(AnsiColors::Default)
}
