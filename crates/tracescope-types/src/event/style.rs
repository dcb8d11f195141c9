use serde::{Deserialize, Serialize};
use std::fmt;

/// Presentation hint attached to an event by the tracer
///
/// Tokens are free-form (`"cyan"`, `"bold"`, `"dim"`); the renderer decides
/// which ones it understands and ignores the rest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleToken(pub String);

impl StyleToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StyleToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}
