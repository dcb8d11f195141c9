//! Text fragments shared by the TUI rows and `dump`.

use tracescope_engine::Symbol;
use tracescope_types::{Address, Event};

/// Width of the timestamp column, including the trailing space
pub const TIMESTAMP_WIDTH: usize = 11;

pub fn heading_label(thread_id: u64) -> String {
    format!("/* TID {:#x} */", thread_id)
}

pub fn timestamp_column(timestamp: u64) -> String {
    let stamp = format!("{} ms", timestamp);
    format!("{:>width$} ", stamp, width = TIMESTAMP_WIDTH - 1)
}

pub fn depth_guides(depth: u32) -> String {
    "| ".repeat(depth as usize)
}

pub fn symbol_label(symbol: Option<&Symbol>) -> &str {
    match symbol {
        Some(Symbol::Resolved(name)) => name,
        Some(Symbol::Pending) => "…",
        Some(Symbol::Unresolved) | None => "??",
    }
}

pub fn detail_header(event: &Event) -> String {
    format!("thread {:#x} · target {}", event.thread_id, event.target_id)
}

pub fn frame_label(position: usize, address: Option<Address>) -> String {
    match address {
        Some(address) => format!("#{:<2} {:>18}", position, address.to_string()),
        None => format!("#{:<2} {:>18}", position, "?"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_column_is_fixed_width() {
        assert_eq!(timestamp_column(5), "      5 ms ");
        assert_eq!(timestamp_column(5).len(), TIMESTAMP_WIDTH);
    }

    #[test]
    fn test_heading_label_uses_hex_thread_id() {
        assert_eq!(heading_label(0x1a2b), "/* TID 0x1a2b */");
    }

    #[test]
    fn test_symbol_labels() {
        assert_eq!(symbol_label(Some(&Symbol::Pending)), "…");
        assert_eq!(symbol_label(Some(&Symbol::Unresolved)), "??");
        assert_eq!(
            symbol_label(Some(&Symbol::Resolved("main+0x4".into()))),
            "main+0x4"
        );
    }

    #[test]
    fn test_frame_label_marks_unknown_frames() {
        assert_eq!(frame_label(0, Some(Address(0x400))), "#0               0x400");
        assert_eq!(frame_label(1, None), "#1                   ?");
    }
}
