// Engine module - Core list logic (grouping, sizing, selection, scrolling)
// This layer sits between raw tracer events (types) and the panel runtime.
// Everything here is synchronous and owned by a single UI thread.

pub mod autoscroll;
pub mod error;
pub mod items;
pub mod offsets;
pub mod selection;
pub mod sizing;
pub mod viewport;

pub use autoscroll::Autoscroll;
pub use error::{Error, Result};
pub use items::{build_items, Item, ItemList};
pub use offsets::OffsetTable;
pub use selection::{
    Applied, Generation, ResolutionOutcome, ResolutionRequest, ResolutionTarget,
    SelectionState, Symbol,
};
pub use sizing::RowSizing;
pub use viewport::{
    Activation, Deactivation, EventsChanged, Toggled, Viewport, ViewportConfig, VisibleRow, Window,
};
