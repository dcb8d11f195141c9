//! Single-selection state and the bookkeeping for symbol resolution.
//!
//! Every selection change bumps a generation counter. Resolution requests
//! carry the generation they were issued under, and their outcomes are only
//! applied while that generation is still current. Anything older is a
//! stale result and is dropped without touching state.

use std::fmt;

use tracescope_types::{Address, Event};

/// Resolution state of one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Pending,
    Resolved(String),
    /// Lookup failed, returned nothing, or the frame had no address
    Unresolved,
}

impl Symbol {
    pub fn is_pending(&self) -> bool {
        matches!(self, Symbol::Pending)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Symbol::Resolved(name) => Some(name),
            Symbol::Pending | Symbol::Unresolved => None,
        }
    }
}

/// Monotonic selection counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a resolution request fills in once it completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionTarget {
    Caller(Address),
    Backtrace {
        /// Known frame addresses, in frame order
        addresses: Vec<Address>,
        /// Frame position of each entry in `addresses`
        positions: Vec<usize>,
        frame_count: usize,
    },
}

/// One symbolication call to issue on behalf of the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub generation: Generation,
    pub event_index: usize,
    pub target: ResolutionTarget,
}

impl ResolutionRequest {
    /// Addresses to hand to the symbolicator, in order
    pub fn addresses(&self) -> Vec<Address> {
        match &self.target {
            ResolutionTarget::Caller(address) => vec![*address],
            ResolutionTarget::Backtrace { addresses, .. } => addresses.clone(),
        }
    }
}

/// Completed request, ready to be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOutcome {
    pub request: ResolutionRequest,
    /// Index-aligned names, or `None` when the call failed
    pub symbols: Option<Vec<String>>,
}

/// Result of applying an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Caller,
    Backtrace { resolved: usize, unresolved: usize },
    /// Selection changed since the request was issued
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: Option<usize>,
    generation: Generation,
    caller: Option<Symbol>,
    backtrace: Option<Vec<Symbol>>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Caller symbol; `None` when cleared or superseded by a backtrace
    pub fn caller(&self) -> Option<&Symbol> {
        self.caller.as_ref()
    }

    pub fn backtrace(&self) -> Option<&[Symbol]> {
        self.backtrace.as_deref()
    }

    /// Select `index`, resetting resolution state to pending.
    ///
    /// Returns the request to issue for the new selection, if the event
    /// carries any address at all.
    pub fn select(&mut self, index: usize, event: &Event) -> Option<ResolutionRequest> {
        self.generation = self.generation.next();
        self.selected = Some(index);
        self.caller = None;
        self.backtrace = None;

        let target = match (&event.backtrace, event.caller) {
            (Some(frames), _) => {
                let mut slots = Vec::with_capacity(frames.len());
                let mut addresses = Vec::new();
                let mut positions = Vec::new();
                for (position, frame) in frames.iter().enumerate() {
                    match frame {
                        Some(address) => {
                            slots.push(Symbol::Pending);
                            addresses.push(*address);
                            positions.push(position);
                        }
                        None => slots.push(Symbol::Unresolved),
                    }
                }
                self.backtrace = Some(slots);
                if addresses.is_empty() {
                    return None;
                }
                ResolutionTarget::Backtrace {
                    addresses,
                    positions,
                    frame_count: frames.len(),
                }
            }
            (None, Some(caller)) => {
                self.caller = Some(Symbol::Pending);
                ResolutionTarget::Caller(caller)
            }
            (None, None) => return None,
        };

        Some(ResolutionRequest {
            generation: self.generation,
            event_index: index,
            target,
        })
    }

    /// Clear the selection. Returns the index that was selected.
    pub fn clear(&mut self) -> Option<usize> {
        let previous = self.selected.take()?;
        self.generation = self.generation.next();
        self.caller = None;
        self.backtrace = None;
        Some(previous)
    }

    pub fn is_current(&self, request: &ResolutionRequest) -> bool {
        request.generation == self.generation && self.selected == Some(request.event_index)
    }

    pub fn apply(&mut self, outcome: ResolutionOutcome) -> Applied {
        if !self.is_current(&outcome.request) {
            return Applied::Stale;
        }

        let symbols = outcome.symbols.unwrap_or_default();
        match outcome.request.target {
            ResolutionTarget::Caller(_) => {
                self.caller = Some(match symbols.into_iter().next() {
                    Some(name) => Symbol::Resolved(name),
                    None => Symbol::Unresolved,
                });
                Applied::Caller
            }
            ResolutionTarget::Backtrace {
                positions,
                frame_count,
                ..
            } => {
                let mut slots = self
                    .backtrace
                    .take()
                    .unwrap_or_else(|| vec![Symbol::Unresolved; frame_count]);
                let mut names = symbols.into_iter();
                let mut resolved = 0;
                for position in positions {
                    let symbol = match names.next() {
                        Some(name) => {
                            resolved += 1;
                            Symbol::Resolved(name)
                        }
                        None => Symbol::Unresolved,
                    };
                    if let Some(slot) = slots.get_mut(position) {
                        *slot = symbol;
                    }
                }
                let unresolved = slots.len() - resolved;
                self.backtrace = Some(slots);
                Applied::Backtrace {
                    resolved,
                    unresolved,
                }
            }
        }
    }
}
