// NOTE: tracescope Architecture Rationale
//
// Why a synchronous engine with a single async seam?
// - Grouping, sizing, selection and scrolling all run on the UI thread
// - Symbol lookups are the only operation that may be slow
// - Outcomes come back over a channel and are checked against the
//   selection generation before they touch state
//
// Why replace the whole event sequence on every log change?
// - Thread headings depend on neighbours, so patching is error-prone
// - A rebuild is one linear pass; the offset table is rebuilt lazily
// - Trade-off: a selection is dropped when the log is rewritten under it
//
// Why log to a file?
// - The TUI owns the terminal; anything on stderr would corrupt the screen

mod args;
mod commands;
pub mod context;
mod handlers;
pub mod logging;
pub mod presentation;
pub mod symbols;
pub mod types;

pub use args::{Cli, Commands, ConfigCommand};
pub use commands::run;
