use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracescope_engine::{ResolutionOutcome, ResolutionRequest};
use tracing::{debug, warn};

use crate::symbolicate::Symbolicator;

/// Runs symbolication off the UI thread and queues the outcomes
///
/// In-flight calls are never aborted. Whether an outcome still matters is
/// decided when it is applied, against the selection generation.
pub struct SymbolResolver {
    symbolicator: Arc<dyn Symbolicator>,
    handle: Handle,
    tx: UnboundedSender<ResolutionOutcome>,
    rx: UnboundedReceiver<ResolutionOutcome>,
    in_flight: usize,
}

impl SymbolResolver {
    pub fn new(symbolicator: Arc<dyn Symbolicator>, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            symbolicator,
            handle,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Requests issued but not yet drained
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn dispatch(&mut self, request: ResolutionRequest) {
        let addresses = request.addresses();
        let expected = addresses.len();
        debug!(
            generation = %request.generation,
            event = request.event_index,
            addresses = expected,
            "requesting symbols"
        );

        let call = self.symbolicator.symbolicate(addresses);
        let tx = self.tx.clone();
        self.in_flight += 1;

        self.handle.spawn(async move {
            // Run the call as its own task so a panicking backend still
            // produces an outcome instead of leaving the slots pending.
            let symbols = match tokio::spawn(call).await {
                Ok(Ok(names)) => {
                    if names.len() < expected {
                        warn!(
                            generation = %request.generation,
                            requested = expected,
                            returned = names.len(),
                            "symbolicator returned fewer names than requested"
                        );
                    }
                    Some(names)
                }
                Ok(Err(err)) => {
                    warn!(generation = %request.generation, error = %err, "symbolication failed");
                    None
                }
                Err(err) => {
                    warn!(generation = %request.generation, error = %err, "symbolication task aborted");
                    None
                }
            };

            // Receiver gone means the panel was dropped; nothing to update.
            let _ = tx.send(ResolutionOutcome { request, symbols });
        });
    }

    /// Next completed outcome, without waiting
    pub fn try_next(&mut self) -> Option<ResolutionOutcome> {
        let outcome = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }

    /// Wait for the next completed outcome. Returns `None` immediately when
    /// nothing is in flight.
    pub async fn next(&mut self) -> Option<ResolutionOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        let outcome = self.rx.recv().await?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(outcome)
    }
}
