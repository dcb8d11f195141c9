pub mod address;
pub mod event;
pub mod style;

pub use address::*;
pub use event::*;
pub use style::*;
