pub mod config;
pub mod dump;
pub mod view;

use anyhow::{Context, Result};
use std::path::Path;
use tracescope_runtime::{ParsedLog, load_events};
use tracing::warn;

use crate::symbols::{SymbolTable, TableSymbolicator};

fn load_log(path: &Path) -> Result<ParsedLog> {
    let parsed =
        load_events(path).with_context(|| format!("Failed to load events from {}", path.display()))?;
    if !parsed.skipped.is_empty() {
        warn!(
            path = %path.display(),
            skipped = parsed.skipped.len(),
            "some lines were not valid events"
        );
    }
    Ok(parsed)
}

fn symbolicator(symbols: Option<&Path>) -> Result<TableSymbolicator> {
    let table = symbols.map(SymbolTable::load).transpose()?;
    Ok(TableSymbolicator::new(table))
}
