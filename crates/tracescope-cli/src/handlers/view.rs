use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracescope_runtime::{Config, EventLogFollower, Panel};
use tracing::info;

use super::{load_log, symbolicator};
use crate::presentation::renderers::{TuiHost, TuiRenderer};

pub fn handle(config: &Config, events: &Path, symbols: Option<&Path>, follow: bool) -> Result<()> {
    // Symbol lookups run here; the UI stays on the calling thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("tracescope-symbols")
        .enable_all()
        .build()?;

    let symbolicator = Arc::new(symbolicator(symbols)?);
    let mut panel = Panel::new(config, symbolicator, runtime.handle().clone(), TuiHost::default());

    let follower = if follow {
        info!(path = %events.display(), "following event log");
        Some(EventLogFollower::new(
            events.to_path_buf(),
            config.follow.poll_interval(),
        )?)
    } else {
        let parsed = load_log(events)?;
        info!(path = %events.display(), events = parsed.events.len(), "event log loaded");
        panel.set_events(parsed.events.into());
        None
    };

    let result = TuiRenderer::new(panel, follower).run();
    runtime.shutdown_background();
    result
}
