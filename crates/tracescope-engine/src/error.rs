use std::fmt;

/// Result type for tracescope-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised by viewport operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Selection refers to an event index that does not exist
    SelectionOutOfRange { index: usize, len: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SelectionOutOfRange { index, len } => write!(
                f,
                "Selection out of range: event {} requested, {} events loaded",
                index, len
            ),
        }
    }
}

impl std::error::Error for Error {}
