//! Symbolication from an `nm`-style symbol table.
//!
//! Each line is `<hex address> [type] <name>`. Undefined symbols (no
//! address) and comment lines are ignored.

use anyhow::{Context, Result};
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use std::path::Path;
use std::sync::Arc;
use tracescope_runtime::{SymbolicateError, Symbolicator};
use tracescope_types::Address;

/// Placeholder returned for an address that falls before every symbol
pub const UNKNOWN_SYMBOL: &str = "??";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    /// Sorted by start address
    entries: Vec<(u64, String)>,
}

impl SymbolTable {
    pub fn parse(content: &str) -> Self {
        let mut entries: Vec<(u64, String)> = content
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    return None;
                }
                let mut fields = line.split_whitespace();
                let address = fields.next()?;
                let address = u64::from_str_radix(address.trim_start_matches("0x"), 16).ok()?;
                let rest: Vec<&str> = fields.collect();
                let name = match rest.as_slice() {
                    [name] => *name,
                    [kind, name, ..] if kind.len() == 1 => *name,
                    [name, ..] => *name,
                    [] => return None,
                };
                Some((address, name.to_string()))
            })
            .collect();

        entries.sort_by_key(|(address, _)| *address);
        entries.dedup_by_key(|(address, _)| *address);
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read symbol table {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `name` or `name+0xoff` of the nearest symbol at or below `address`.
    pub fn lookup(&self, address: Address) -> Option<String> {
        let value = address.value();
        let index = self.entries.partition_point(|(start, _)| *start <= value);
        let (start, name) = self.entries.get(index.checked_sub(1)?)?;
        let offset = value - start;
        if offset == 0 {
            Some(name.clone())
        } else {
            Some(format!("{}+{:#x}", name, offset))
        }
    }
}

/// Symbolicator backed by an optional symbol table
///
/// Without a table every call fails as unavailable. A batch fails only when
/// none of its addresses resolve; otherwise unknown entries come back as
/// [`UNKNOWN_SYMBOL`] so the result stays index-aligned.
#[derive(Debug, Clone, Default)]
pub struct TableSymbolicator {
    table: Option<Arc<SymbolTable>>,
}

impl TableSymbolicator {
    pub fn new(table: Option<SymbolTable>) -> Self {
        Self {
            table: table.map(Arc::new),
        }
    }

    pub fn resolve(&self, addresses: &[Address]) -> Result<Vec<String>, SymbolicateError> {
        let Some(table) = &self.table else {
            return Err(SymbolicateError::Unavailable(
                "no symbol table loaded".to_string(),
            ));
        };

        let names: Vec<Option<String>> = addresses.iter().map(|a| table.lookup(*a)).collect();
        if names.iter().all(Option::is_none) {
            return Err(SymbolicateError::Failed(format!(
                "no symbol covers {} address(es)",
                addresses.len()
            )));
        }

        Ok(names
            .into_iter()
            .map(|name| name.unwrap_or_else(|| UNKNOWN_SYMBOL.to_string()))
            .collect())
    }
}

impl Symbolicator for TableSymbolicator {
    fn symbolicate(
        &self,
        addresses: Vec<Address>,
    ) -> BoxFuture<'static, Result<Vec<String>, SymbolicateError>> {
        future::ready(self.resolve(&addresses)).boxed()
    }
}
