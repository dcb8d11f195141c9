use std::fmt;

use futures::future::BoxFuture;
use tracescope_types::Address;

/// Why a symbolication call produced no names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolicateError {
    /// The backend could not be reached or refused the request
    Unavailable(String),
    /// The backend answered but could not resolve the batch
    Failed(String),
}

impl fmt::Display for SymbolicateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolicateError::Unavailable(msg) => write!(f, "Symbolicator unavailable: {}", msg),
            SymbolicateError::Failed(msg) => write!(f, "Symbolication failed: {}", msg),
        }
    }
}

impl std::error::Error for SymbolicateError {}

/// Resolves raw addresses to symbol names
///
/// Results are index-aligned with `addresses`. Implementations must accept
/// both single addresses and whole backtraces in one call.
pub trait Symbolicator: Send + Sync {
    fn symbolicate(
        &self,
        addresses: Vec<Address>,
    ) -> BoxFuture<'static, Result<Vec<String>, SymbolicateError>>;
}
