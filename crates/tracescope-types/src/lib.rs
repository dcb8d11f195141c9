pub mod error;
pub mod event;

pub use error::{Error, Result};
pub use event::*;
