use tracescope_runtime::PanelHost;
use tracescope_types::{Address, TargetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    Activate(TargetId, usize),
    Deactivate(TargetId, usize),
    Disassemble(Address),
}

/// Panel host that remembers every hook call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }
}

impl PanelHost for RecordingHost {
    fn on_activate(&mut self, target: TargetId, index: usize) {
        self.calls.push(HostCall::Activate(target, index));
    }

    fn on_deactivate(&mut self, target: TargetId, index: usize) {
        self.calls.push(HostCall::Deactivate(target, index));
    }

    fn on_disassemble(&mut self, address: Address) {
        self.calls.push(HostCall::Disassemble(address));
    }
}
