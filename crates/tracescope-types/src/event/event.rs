use serde::{Deserialize, Serialize};
use std::fmt;

use super::address::Address;
use super::style::StyleToken;

// NOTE: Event Model
//
// Events are produced by the tracer agent and never change once recorded.
// The panel only ever receives whole replacements of the event sequence,
// so nothing here is mutable after decoding.
//
// - `backtrace` supersedes `caller`: when a backtrace is present the caller
//   is not shown as a separate frame.
// - `message` is raw agent output: it may span lines and carry ANSI SGR
//   colour escapes.

/// Identifier of the hook/handler that emitted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct TargetId(pub u32);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded occurrence in the traced program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Handler that produced this event
    pub target_id: TargetId,

    /// Milliseconds since the trace started
    pub timestamp: u64,

    /// OS thread the event was captured on
    pub thread_id: u64,

    /// Call nesting depth, drives indentation
    #[serde(default)]
    pub depth: u32,

    /// Return address of the traced call, if captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<Address>,

    /// Captured call stack; individual frames may be unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backtrace: Option<Vec<Option<Address>>>,

    pub message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style: Vec<StyleToken>,
}

impl Event {
    /// Number of newline-delimited segments in the message (at least one)
    pub fn message_lines(&self) -> usize {
        self.message.split('\n').count()
    }

    /// Frame count of the backtrace, if one was captured
    pub fn frame_count(&self) -> Option<usize> {
        self.backtrace.as_ref().map(Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_event() {
        let json = r#"{"target_id":3,"timestamp":12,"thread_id":1234,"message":"open()"}"#;
        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.target_id, TargetId(3));
        assert_eq!(event.depth, 0);
        assert!(event.caller.is_none());
        assert!(event.backtrace.is_none());
        assert!(event.style.is_empty());
    }

    #[test]
    fn test_deserialize_backtrace_with_unknown_frames() {
        let json = r#"{
            "target_id": 1,
            "timestamp": 40,
            "thread_id": 7,
            "depth": 2,
            "caller": "0x1000",
            "backtrace": ["0x1", null, 3],
            "message": "read()\n  fd=3",
            "style": ["cyan"]
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(
            event.backtrace,
            Some(vec![Some(Address(1)), None, Some(Address(3))])
        );
        assert_eq!(event.message_lines(), 2);
        assert_eq!(event.frame_count(), Some(3));
        assert_eq!(event.style, vec![StyleToken::from("cyan")]);
    }

    #[test]
    fn test_message_lines_counts_segments() {
        let mut event: Event = serde_json::from_str(
            r#"{"target_id":0,"timestamp":0,"thread_id":1,"message":""}"#,
        )
        .unwrap();
        assert_eq!(event.message_lines(), 1);

        event.message = "a\nb\n".to_string();
        assert_eq!(event.message_lines(), 3);
    }
}
