//! Fixtures for synthetic event data.
//!
//! Provides utilities to:
//! - Build single events with only the fields a test cares about
//! - Generate deterministic multi-thread logs
//! - Write logs to disk in the JSONL format the CLI reads

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracescope_types::{Address, Event, StyleToken, TargetId};

/// Builder for a single event with deterministic defaults
/// (target 0, timestamp 0, depth 0, no addresses, no style).
#[derive(Debug, Clone)]
pub struct EventBuilder {
    event: Event,
}

impl EventBuilder {
    pub fn new(thread_id: u64, message: &str) -> Self {
        Self {
            event: Event {
                target_id: TargetId(0),
                timestamp: 0,
                thread_id,
                depth: 0,
                caller: None,
                backtrace: None,
                message: message.to_string(),
                style: Vec::new(),
            },
        }
    }

    pub fn target(mut self, target_id: u32) -> Self {
        self.event.target_id = TargetId(target_id);
        self
    }

    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.event.timestamp = timestamp;
        self
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.event.depth = depth;
        self
    }

    pub fn caller(mut self, address: u64) -> Self {
        self.event.caller = Some(Address(address));
        self
    }

    /// Backtrace where every frame has a known address.
    pub fn backtrace(mut self, frames: &[u64]) -> Self {
        self.event.backtrace = Some(frames.iter().map(|&a| Some(Address(a))).collect());
        self
    }

    /// Backtrace that may contain frames without an address.
    pub fn backtrace_frames(mut self, frames: &[Option<u64>]) -> Self {
        self.event.backtrace = Some(frames.iter().map(|a| a.map(Address)).collect());
        self
    }

    pub fn style(mut self, tokens: &[&str]) -> Self {
        self.event.style = tokens.iter().map(|&t| StyleToken::from(t)).collect();
        self
    }

    pub fn build(self) -> Event {
        self.event
    }
}

/// Consecutive runs of events, one `(thread_id, count)` pair per run.
///
/// Messages are numbered by overall position (`"event 0"`, `"event 1"`, ...),
/// so a longer log built from the same prefix compares equal on that prefix.
/// Timestamps follow the position too.
pub fn thread_runs(runs: &[(u64, usize)]) -> Vec<Event> {
    let mut events = Vec::new();
    for &(thread_id, count) in runs {
        for _ in 0..count {
            let position = events.len();
            events.push(
                EventBuilder::new(thread_id, &format!("event {}", position))
                    .timestamp(position as u64)
                    .build(),
            );
        }
    }
    events
}

pub fn to_jsonl(events: &[Event]) -> Result<String> {
    let mut out = String::new();
    for event in events {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn write_jsonl(path: &Path, events: &[Event]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_jsonl(events)?)?;
    Ok(())
}

/// Small log covering two threads, nesting, a caller and a backtrace.
pub fn sample_session() -> Vec<Event> {
    vec![
        EventBuilder::new(0x1a2b, "open(\"/etc/hosts\")")
            .target(1)
            .timestamp(120)
            .style(&["green"])
            .caller(0x4005d0)
            .build(),
        EventBuilder::new(0x1a2b, "read(fd=3, count=4096)")
            .target(1)
            .timestamp(121)
            .depth(1)
            .style(&["green"])
            .backtrace(&[0x4006a0, 0x400720, 0x400800])
            .build(),
        EventBuilder::new(0x1a2c, "connect()\n  sa_family=AF_INET")
            .target(1)
            .timestamp(125)
            .style(&["magenta"])
            .build(),
        EventBuilder::new(0x1a2b, "close(fd=3)")
            .target(1)
            .timestamp(130)
            .style(&["green"])
            .build(),
    ]
}
