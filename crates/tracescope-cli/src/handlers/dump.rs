use anyhow::{bail, Result};
use is_terminal::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracescope_runtime::{Config, NullHost, Panel};

use super::{load_log, symbolicator};
use crate::presentation::views::{DumpOptions, DumpView};

pub fn handle(
    config: &Config,
    events: &Path,
    select: Option<usize>,
    symbols: Option<&Path>,
    no_color: bool,
) -> Result<()> {
    let parsed = load_log(events)?;
    let count = parsed.events.len();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let symbolicator = Arc::new(symbolicator(symbols)?);
    let mut panel = Panel::new(config, symbolicator, runtime.handle().clone(), NullHost);
    panel.set_events(parsed.events.into());

    if let Some(index) = select {
        if index >= count {
            bail!("Event index {} out of range ({} events)", index, count);
        }
        panel.activate(index);
        runtime.block_on(panel.settle());
    }

    let viewport = panel.viewport();
    let view = DumpView {
        items: viewport.items(),
        selection: viewport.selection(),
        options: DumpOptions {
            enable_color: !no_color && std::io::stdout().is_terminal(),
        },
    };
    print!("{}", view);
    Ok(())
}
