// Views turn engine state into terminal output.
// `rows` is shared by the TUI list and has no knowledge of scrolling.

pub mod dump;
pub mod event_list;
pub mod rows;
pub mod status_bar;

pub use dump::{DumpOptions, DumpView};
pub use event_list::EventListView;
pub use rows::RowRenderer;
pub use status_bar::{StatusBarModel, StatusBarView};
