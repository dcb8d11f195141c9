//! Panel runtime for tracescope.
//!
//! Ties the synchronous list engine to the outside world:
//! - [`Panel`] owns one viewport and forwards selection changes to the host
//! - [`SymbolResolver`] runs symbolication on tokio and hands outcomes back
//!   to the UI thread, where stale ones are dropped
//! - [`source`] loads and follows JSONL event logs
//! - [`config`] reads layout and viewport settings from TOML

pub mod config;
pub mod error;
pub mod host;
pub mod panel;
pub mod resolver;
pub mod source;
pub mod symbolicate;

pub use config::Config;
pub use error::{Error, Result};
pub use host::{NullHost, PanelHost};
pub use panel::Panel;
pub use resolver::SymbolResolver;
pub use source::{load_events, parse_events, EventLogFollower, LogUpdate, ParsedLog, SkippedLine};
pub use symbolicate::{SymbolicateError, Symbolicator};
