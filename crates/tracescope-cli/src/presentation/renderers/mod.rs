pub mod tui;

pub use tui::{TuiHost, TuiRenderer};
