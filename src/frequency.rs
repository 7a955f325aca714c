//! Symbol frequency counting.

use crate::error::CompressError;
use crate::symbol::{Symbol, SymbolReader};
use std::collections::BTreeMap;
use std::io::Read;

/// Occurrence count per distinct symbol, iterated in symbol order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, u64>,
    total: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every symbol of a full pass over `reader`.
    pub fn from_reader<R: Read>(reader: R, buffer_size: usize) -> Result<Self, CompressError> {
        let mut table = Self::new();
        for symbol in SymbolReader::with_capacity(buffer_size, reader) {
            table.record(symbol?);
        }
        Ok(table)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CompressError> {
        Self::from_reader(data, data.len().max(1))
    }

    pub fn record(&mut self, symbol: Symbol) {
        *self.counts.entry(symbol).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn count(&self, symbol: &Symbol) -> u64 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of symbols seen.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, u64)> {
        self.counts.iter().map(|(s, &c)| (s, c))
    }
}
