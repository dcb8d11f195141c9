pub mod ansi;
pub mod labels;
pub mod theme;

pub use ansi::{parse_ansi, strip_ansi};
pub use labels::{
    depth_guides, detail_header, frame_label, heading_label, symbol_label, timestamp_column,
    TIMESTAMP_WIDTH,
};
pub use theme::style_from_tokens;
