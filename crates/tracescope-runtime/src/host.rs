use tracescope_types::{Address, TargetId};

/// Host-side hooks fired by the panel
///
/// Selection itself lives in the panel; these calls let the host keep its
/// own bookkeeping (other panels, status lines) in step.
pub trait PanelHost {
    fn on_activate(&mut self, target: TargetId, index: usize);

    fn on_deactivate(&mut self, target: TargetId, index: usize);

    /// Fire-and-forget request to show disassembly at `address`
    fn on_disassemble(&mut self, address: Address);
}

/// Host that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl PanelHost for NullHost {
    fn on_activate(&mut self, _target: TargetId, _index: usize) {}

    fn on_deactivate(&mut self, _target: TargetId, _index: usize) {}

    fn on_disassemble(&mut self, _address: Address) {}
}
