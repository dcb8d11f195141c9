//! JSONL event logs: one serialized [`Event`] per line.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use notify::{Event as FsEvent, EventKind, PollWatcher, RecursiveMode, Watcher};
use tracescope_types::Event;
use tracing::{debug, warn};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    pub events: Vec<Event>,
    pub skipped: Vec<SkippedLine>,
}

/// Parse a JSONL event log. Blank lines are ignored and malformed lines
/// are skipped, never fatal.
pub fn parse_events(content: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Event>(line) {
            Ok(event) => parsed.events.push(event),
            Err(err) => {
                warn!(line = number + 1, error = %err, "skipping malformed event");
                parsed.skipped.push(SkippedLine {
                    line: number + 1,
                    reason: err.to_string(),
                });
            }
        }
    }

    parsed
}

pub fn load_events(path: &Path) -> Result<ParsedLog> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_events(&content))
}

#[derive(Debug, Clone)]
pub enum LogUpdate {
    /// Complete replacement for the panel's event sequence
    Loaded {
        events: Arc<[Event]>,
        skipped: usize,
    },
    Error(String),
}

/// Reloads an event log whenever it changes on disk
///
/// Every change yields a whole new sequence; the panel regroups from
/// scratch rather than patching.
pub struct EventLogFollower {
    _watcher: PollWatcher,
    rx: Receiver<LogUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

struct FollowState {
    path: PathBuf,
    last: Option<Fingerprint>,
}

impl EventLogFollower {
    /// Start watching `path`. The current contents are sent right away.
    pub fn new(path: PathBuf, poll_interval: Duration) -> Result<Self> {
        let (tx_out, rx_out) = channel();
        let (tx_fs, rx_fs) = channel();

        let config = notify::Config::default()
            .with_poll_interval(poll_interval)
            .with_compare_contents(false);

        let mut watcher = PollWatcher::new(
            move |res: notify::Result<FsEvent>| {
                if let Ok(event) = res {
                    let _ = tx_fs.send(event);
                }
            },
            config,
        )?;

        let watch_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        let mut state = FollowState { path, last: None };
        state.reload(&tx_out);

        let tx_worker = tx_out.clone();
        std::thread::Builder::new()
            .name("event-log-follower".to_string())
            .spawn(move || {
                while let Ok(event) = rx_fs.recv() {
                    if state.concerns(&event) {
                        state.reload(&tx_worker);
                    }
                }
                debug!("event log watcher closed");
            })?;

        Ok(Self {
            _watcher: watcher,
            rx: rx_out,
        })
    }

    pub fn receiver(&self) -> &Receiver<LogUpdate> {
        &self.rx
    }

    /// Latest pending update, collapsing any backlog into the newest one.
    pub fn try_latest(&self) -> Option<LogUpdate> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(update) => latest = Some(update),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        latest
    }
}

impl FollowState {
    fn concerns(&self, event: &FsEvent) -> bool {
        let relevant_kind = matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
        );
        relevant_kind
            && event
                .paths
                .iter()
                .any(|p| p.file_name() == self.path.file_name())
    }

    fn reload(&mut self, tx: &Sender<LogUpdate>) {
        let fingerprint = match std::fs::metadata(&self.path) {
            Ok(meta) => Fingerprint {
                len: meta.len(),
                modified: meta.modified().ok(),
            },
            Err(err) => {
                let _ = tx.send(LogUpdate::Error(format!(
                    "Cannot read {}: {}",
                    self.path.display(),
                    err
                )));
                self.last = None;
                return;
            }
        };
        if self.last == Some(fingerprint) {
            return;
        }

        match load_events(&self.path) {
            Ok(parsed) => {
                self.last = Some(fingerprint);
                debug!(
                    path = %self.path.display(),
                    events = parsed.events.len(),
                    skipped = parsed.skipped.len(),
                    "event log reloaded"
                );
                let _ = tx.send(LogUpdate::Loaded {
                    events: parsed.events.into(),
                    skipped: parsed.skipped.len(),
                });
            }
            Err(err) => {
                let _ = tx.send(LogUpdate::Error(err.to_string()));
            }
        }
    }
}
