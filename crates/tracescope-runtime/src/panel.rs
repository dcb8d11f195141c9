use std::sync::Arc;

use tokio::runtime::Handle;
use tracescope_engine::{
    Activation, Applied, Deactivation, EventsChanged, ResolutionOutcome, Toggled, Viewport,
};
use tracescope_types::{Address, Event};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::host::PanelHost;
use crate::resolver::SymbolResolver;
use crate::symbolicate::Symbolicator;

/// One mounted event-log panel
///
/// Wraps the viewport with the pieces that talk to the outside: the host
/// hooks and the symbol resolver. Every method runs on the UI thread;
/// resolution outcomes only land through [`Panel::pump_resolutions`] or
/// [`Panel::next_resolution`].
pub struct Panel<H: PanelHost> {
    viewport: Viewport,
    resolver: SymbolResolver,
    host: H,
}

impl<H: PanelHost> Panel<H> {
    pub fn new(
        config: &Config,
        symbolicator: Arc<dyn Symbolicator>,
        handle: Handle,
        host: H,
    ) -> Self {
        Self::with_resolver(config, SymbolResolver::new(symbolicator, handle), host)
    }

    pub fn with_resolver(config: &Config, resolver: SymbolResolver, host: H) -> Self {
        Self {
            viewport: Viewport::new(config.layout, config.viewport),
            resolver,
            host,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Scrolling and window queries; selection changes should go through
    /// the panel so the host and resolver stay in step.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn pending_resolutions(&self) -> usize {
        self.resolver.in_flight()
    }

    pub fn set_events(&mut self, events: Arc<[Event]>) -> EventsChanged {
        let changed = self.viewport.set_events(events);
        if let Some(deactivation) = changed.deselected {
            info!(
                index = deactivation.index,
                "selection no longer matches the event log, clearing it"
            );
            self.notify_deactivated(deactivation);
        }
        changed
    }

    /// Drive the selection from outside, e.g. from another panel.
    ///
    /// An index this panel does not have clears the current selection, so
    /// no detail is shown for an event the host did not ask for.
    pub fn select(&mut self, index: Option<usize>) {
        let Some(index) = index else {
            self.clear_selection();
            return;
        };

        match self.viewport.activate(index) {
            Ok(Some(activation)) => self.notify_activated(activation),
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "external selection does not exist, clearing selection");
                self.clear_selection();
            }
        }
    }

    /// Returns whether the selection changed.
    pub fn activate(&mut self, index: usize) -> bool {
        let result = self.viewport.activate(index);
        self.handle_activation(result)
    }

    pub fn deactivate(&mut self, index: usize) -> bool {
        match self.viewport.deactivate(index) {
            Some(deactivation) => {
                self.notify_deactivated(deactivation);
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, index: usize) {
        match self.viewport.toggle(index) {
            Ok(Toggled::Activated(activation)) => self.notify_activated(activation),
            Ok(Toggled::Deactivated(deactivation)) => self.notify_deactivated(deactivation),
            Err(err) => warn!(error = %err, "ignoring toggle"),
        }
    }

    pub fn clear_selection(&mut self) -> bool {
        match self.viewport.clear_selection() {
            Some(deactivation) => {
                self.notify_deactivated(deactivation);
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) -> bool {
        let result = self.viewport.select_next();
        self.handle_activation(result)
    }

    pub fn select_previous(&mut self) -> bool {
        let result = self.viewport.select_previous();
        self.handle_activation(result)
    }

    /// Ask the host to disassemble the selected event's call site.
    pub fn disassemble_caller(&mut self) -> Option<Address> {
        let address = self.selected_event()?.caller?;
        self.host.on_disassemble(address);
        Some(address)
    }

    /// Ask the host to disassemble one backtrace frame of the selection.
    /// Frames without an address are skipped silently.
    pub fn disassemble_frame(&mut self, frame: usize) -> Option<Address> {
        let address = self
            .selected_event()?
            .backtrace
            .as_ref()?
            .get(frame)
            .copied()
            .flatten()?;
        self.host.on_disassemble(address);
        Some(address)
    }

    /// Apply every outcome that has already arrived, without waiting.
    pub fn pump_resolutions(&mut self) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.resolver.try_next() {
            self.apply(outcome);
            applied += 1;
        }
        applied
    }

    /// Wait for the next outcome and apply it. `None` when nothing is in
    /// flight.
    pub async fn next_resolution(&mut self) -> Option<Applied> {
        let outcome = self.resolver.next().await?;
        Some(self.apply(outcome))
    }

    /// Wait until every in-flight request has been delivered.
    pub async fn settle(&mut self) {
        while self.next_resolution().await.is_some() {}
    }

    fn selected_event(&self) -> Option<&Event> {
        let index = self.viewport.selection().selected()?;
        self.viewport.items().events().get(index)
    }

    fn apply(&mut self, outcome: ResolutionOutcome) -> Applied {
        let generation = outcome.request.generation;
        let applied = self.viewport.selection_mut().apply(outcome);
        match applied {
            Applied::Stale => {
                debug!(%generation, "discarding stale symbols")
            }
            Applied::Caller => debug!(%generation, "caller resolved"),
            Applied::Backtrace {
                resolved,
                unresolved,
            } => debug!(%generation, resolved, unresolved, "backtrace resolved"),
        }
        applied
    }

    fn handle_activation(&mut self, result: tracescope_engine::Result<Option<Activation>>) -> bool {
        match result {
            Ok(Some(activation)) => {
                self.notify_activated(activation);
                true
            }
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "ignoring selection");
                false
            }
        }
    }

    fn notify_activated(&mut self, activation: Activation) {
        // The previous selection was implicitly dropped; the host only hears
        // about the new one.
        self.host.on_activate(activation.target, activation.index);
        if let Some(request) = activation.request {
            self.resolver.dispatch(request);
        }
    }

    fn notify_deactivated(&mut self, deactivation: Deactivation) {
        self.host
            .on_deactivate(deactivation.target, deactivation.index);
    }
}
