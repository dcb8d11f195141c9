use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tokio::runtime::Handle;
use tracescope_engine::Symbol;
use tracescope_runtime::{Config, Panel, SymbolicateError, Symbolicator};
use tracescope_testing::fixtures::EventBuilder;
use tracescope_testing::{GatedSymbolicator, HostCall, NamingSymbolicator, RecordingHost};
use tracescope_types::{Address, Event, TargetId};

fn panel(symbolicator: Arc<dyn Symbolicator>, events: Vec<Event>) -> Panel<RecordingHost> {
    let mut panel = Panel::new(
        &Config::default(),
        symbolicator,
        Handle::current(),
        RecordingHost::new(),
    );
    panel.viewport_mut().set_viewport_height(20);
    panel.set_events(events.into());
    panel
}

fn resolved(name: &str) -> Symbol {
    Symbol::Resolved(name.to_string())
}

#[tokio::test]
async fn test_only_latest_selection_symbols_survive() {
    let gate = GatedSymbolicator::new();
    let mut panel = panel(
        Arc::new(gate.clone()),
        vec![
            EventBuilder::new(1, "k").caller(0x1000).build(),
            EventBuilder::new(1, "m").caller(0x2000).build(),
        ],
    );

    panel.activate(0);
    panel.activate(1);
    // m answers first, k's late answer must not overwrite it
    gate.release(1);
    gate.release(0);
    panel.settle().await;

    let selection = panel.viewport().selection();
    assert_eq!(selection.selected(), Some(1));
    assert_eq!(selection.caller(), Some(&resolved("sym_2000")));
}

#[tokio::test]
async fn test_rapid_backtrace_selections_never_mix() {
    let gate = GatedSymbolicator::new();
    let mut panel = panel(
        Arc::new(gate.clone()),
        vec![
            EventBuilder::new(1, "k").backtrace(&[0x10, 0x20]).build(),
            EventBuilder::new(1, "m").backtrace(&[0x30, 0x40]).build(),
        ],
    );

    panel.activate(0);
    panel.activate(1);
    gate.release(0);
    panel.settle().await;
    assert_eq!(
        panel.viewport().selection().backtrace(),
        Some(&[Symbol::Pending, Symbol::Pending][..])
    );

    gate.release(1);
    panel.settle().await;
    assert_eq!(
        panel.viewport().selection().backtrace(),
        Some(&[resolved("sym_30"), resolved("sym_40")][..])
    );
}

#[tokio::test]
async fn test_deselect_before_completion_leaves_backtrace_cleared() {
    let gate = GatedSymbolicator::new();
    let mut panel = panel(
        Arc::new(gate.clone()),
        vec![EventBuilder::new(1, "x").backtrace(&[0x1, 0x2, 0x3]).build()],
    );

    panel.activate(0);
    assert!(panel.deactivate(0));
    gate.release(0);
    panel.settle().await;

    assert!(panel.viewport().selection().backtrace().is_none());
    assert!(panel.viewport().selection().caller().is_none());
}

#[tokio::test]
async fn test_caller_only_event_issues_single_request() {
    let gate = GatedSymbolicator::new();
    let mut panel = panel(
        Arc::new(gate.clone()),
        vec![EventBuilder::new(1, "x").caller(0x1000).build()],
    );

    panel.activate(0);

    assert_eq!(gate.requests(), vec![vec![Address(0x1000)]]);
    gate.release_all();
    panel.settle().await;
}

#[tokio::test]
async fn test_backtrace_event_issues_one_batched_request_regardless_of_caller() {
    let gate = GatedSymbolicator::new();
    let mut panel = panel(
        Arc::new(gate.clone()),
        vec![
            EventBuilder::new(1, "x")
                .caller(0x1000)
                .backtrace(&[0x1, 0x2])
                .build(),
        ],
    );

    panel.activate(0);

    assert_eq!(gate.requests(), vec![vec![Address(0x1), Address(0x2)]]);
    gate.release_all();
    panel.settle().await;
    assert!(panel.viewport().selection().caller().is_none());
}

#[tokio::test]
async fn test_event_without_addresses_issues_no_request() {
    let gate = GatedSymbolicator::new();
    let mut panel = panel(
        Arc::new(gate.clone()),
        vec![EventBuilder::new(1, "plain").build()],
    );

    assert!(panel.activate(0));

    assert!(gate.requests().is_empty());
    assert_eq!(panel.pending_resolutions(), 0);
}

#[tokio::test]
async fn test_failed_resolution_marks_slots_unresolved() {
    let gate = GatedSymbolicator::new();
    let mut panel = panel(
        Arc::new(gate.clone()),
        vec![
            EventBuilder::new(1, "a").caller(0x1000).build(),
            EventBuilder::new(1, "b").backtrace(&[0x1, 0x2]).build(),
        ],
    );

    panel.activate(0);
    gate.fail(0);
    panel.settle().await;
    assert_eq!(panel.viewport().selection().caller(), Some(&Symbol::Unresolved));

    panel.activate(1);
    gate.fail(1);
    panel.settle().await;
    assert_eq!(
        panel.viewport().selection().backtrace(),
        Some(&[Symbol::Unresolved, Symbol::Unresolved][..])
    );
}

#[tokio::test]
async fn test_short_result_leaves_trailing_frames_unresolved() {
    let gate = GatedSymbolicator::new();
    let mut panel = panel(
        Arc::new(gate.clone()),
        vec![EventBuilder::new(1, "x").backtrace(&[0x1, 0x2, 0x3]).build()],
    );

    panel.activate(0);
    gate.release_with(0, &["main"]);
    panel.settle().await;

    assert_eq!(
        panel.viewport().selection().backtrace(),
        Some(&[resolved("main"), Symbol::Unresolved, Symbol::Unresolved][..])
    );
}

struct PanickingSymbolicator;

impl Symbolicator for PanickingSymbolicator {
    fn symbolicate(
        &self,
        _addresses: Vec<Address>,
    ) -> BoxFuture<'static, Result<Vec<String>, SymbolicateError>> {
        future::lazy(|_| -> Result<Vec<String>, SymbolicateError> { panic!("backend crashed") })
            .boxed()
    }
}

#[tokio::test]
async fn test_panicking_backend_degrades_to_unresolved() {
    let mut panel = panel(
        Arc::new(PanickingSymbolicator),
        vec![EventBuilder::new(1, "x").caller(0x1000).build()],
    );

    panel.activate(0);
    panel.settle().await;

    assert_eq!(panel.viewport().selection().caller(), Some(&Symbol::Unresolved));
}

#[tokio::test]
async fn test_pump_applies_without_waiting() {
    let mut panel = panel(
        Arc::new(NamingSymbolicator),
        vec![EventBuilder::new(1, "x").caller(0xbeef).build()],
    );

    panel.activate(0);

    let mut applied = 0;
    for _ in 0..100 {
        tokio::task::yield_now().await;
        applied += panel.pump_resolutions();
        if applied > 0 {
            break;
        }
    }

    assert_eq!(applied, 1);
    assert_eq!(panel.viewport().selection().caller(), Some(&resolved("sym_beef")));
}

#[tokio::test]
async fn test_host_hooks_follow_selection_transitions() {
    let mut panel = panel(
        Arc::new(NamingSymbolicator),
        vec![
            EventBuilder::new(1, "a").target(4).build(),
            EventBuilder::new(1, "b").target(4).build(),
        ],
    );

    panel.activate(0);
    panel.activate(1);
    // not the current selection, ignored
    assert!(!panel.deactivate(0));
    panel.toggle(1);
    // out of range, ignored
    assert!(!panel.activate(9));

    assert_eq!(
        panel.host_mut().take(),
        vec![
            HostCall::Activate(TargetId(4), 0),
            HostCall::Activate(TargetId(4), 1),
            HostCall::Deactivate(TargetId(4), 1),
        ]
    );
}

#[tokio::test]
async fn test_external_selection_input() {
    let mut panel = panel(
        Arc::new(NamingSymbolicator),
        vec![
            EventBuilder::new(1, "a").build(),
            EventBuilder::new(2, "b").build(),
        ],
    );

    panel.select(Some(1));
    assert_eq!(panel.viewport().selection().selected(), Some(1));

    panel.select(None);
    assert_eq!(panel.viewport().selection().selected(), None);
    assert_eq!(panel.host().calls.len(), 2);
}

#[tokio::test]
async fn test_external_selection_of_missing_event_clears_detail() {
    let mut panel = panel(
        Arc::new(NamingSymbolicator),
        vec![
            EventBuilder::new(1, "a").caller(0x1000).build(),
            EventBuilder::new(2, "b").build(),
        ],
    );
    panel.select(Some(0));
    panel.settle().await;
    panel.host_mut().take();

    panel.select(Some(7));

    assert_eq!(panel.viewport().selection().selected(), None);
    assert!(panel.viewport().selection().caller().is_none());
    assert_eq!(
        panel.host_mut().take(),
        vec![HostCall::Deactivate(TargetId(0), 0)]
    );
}

#[tokio::test]
async fn test_missing_user_activation_keeps_selection() {
    let mut panel = panel(
        Arc::new(NamingSymbolicator),
        vec![EventBuilder::new(1, "a").build()],
    );
    panel.select(Some(0));

    assert!(!panel.activate(5));

    assert_eq!(panel.viewport().selection().selected(), Some(0));
}

#[tokio::test]
async fn test_disassembly_requests_reach_host() {
    let mut panel = panel(
        Arc::new(NamingSymbolicator),
        vec![
            EventBuilder::new(1, "x")
                .caller(0x1000)
                .backtrace_frames(&[Some(0x2000), None])
                .build(),
        ],
    );

    assert_eq!(panel.disassemble_caller(), None);

    panel.activate(0);
    assert_eq!(panel.disassemble_caller(), Some(Address(0x1000)));
    assert_eq!(panel.disassemble_frame(0), Some(Address(0x2000)));
    assert_eq!(panel.disassemble_frame(1), None);
    assert_eq!(panel.disassemble_frame(5), None);
    panel.settle().await;

    let calls = panel.host_mut().take();
    assert_eq!(
        &calls[1..],
        &[
            HostCall::Disassemble(Address(0x1000)),
            HostCall::Disassemble(Address(0x2000)),
        ]
    );
}

#[tokio::test]
async fn test_reshaped_log_clears_selection_and_notifies_host() {
    let gate = GatedSymbolicator::new();
    let mut panel = panel(
        Arc::new(gate.clone()),
        vec![
            EventBuilder::new(1, "a").build(),
            EventBuilder::new(1, "b").caller(0x10).build(),
        ],
    );
    panel.activate(1);

    let changed = panel.set_events(
        vec![
            EventBuilder::new(1, "a").build(),
            EventBuilder::new(1, "c").build(),
        ]
        .into(),
    );

    assert!(changed.deselected.is_some());
    assert_eq!(panel.viewport().selection().selected(), None);
    assert_eq!(
        panel.host().calls.last(),
        Some(&HostCall::Deactivate(TargetId(0), 1))
    );

    // the old request still completes but changes nothing
    gate.release(0);
    panel.settle().await;
    assert!(panel.viewport().selection().caller().is_none());
}
