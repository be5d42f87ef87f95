//! Transaction-count sources.
//!
//! The engine never generates activity figures itself; the consensus layer
//! hands in whatever it counted from the finalized block contents.

use crate::types::BlockNumber;
use std::collections::BTreeMap;

/// Supplies the number of transactions observed in a block.
pub trait TxCountSource {
    fn tx_count(&self, block: &BlockNumber) -> u64;
}

impl<F> TxCountSource for F
where
    F: Fn(&BlockNumber) -> u64,
{
    fn tx_count(&self, block: &BlockNumber) -> u64 {
        self(block)
    }
}

/// Same count for every block
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedTxCount(pub u64);

impl TxCountSource for FixedTxCount {
    fn tx_count(&self, _block: &BlockNumber) -> u64 {
        self.0
    }
}

/// Per-block counts recorded from finalized blocks. Blocks that were never
/// recorded count as empty.
#[derive(Clone, Debug, Default)]
pub struct RecordedTxCounts {
    counts: BTreeMap<BlockNumber, u64>,
}

impl RecordedTxCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the count for `block`, replacing any earlier value.
    pub fn record(&mut self, block: BlockNumber, tx: u64) {
        self.counts.insert(block, tx);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(BlockNumber, u64)> for RecordedTxCounts {
    fn from_iter<I: IntoIterator<Item = (BlockNumber, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

impl TxCountSource for RecordedTxCounts {
    fn tx_count(&self, block: &BlockNumber) -> u64 {
        self.counts.get(block).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_count_ignores_block() {
        let source = FixedTxCount(9);
        assert_eq!(source.tx_count(&BlockNumber::from(1u32)), 9);
        assert_eq!(source.tx_count(&BlockNumber::from(10_000u32)), 9);
    }

    #[test]
    fn closure_source() {
        let source = |block: &BlockNumber| if block == &BlockNumber::from(3u32) { 5 } else { 1 };
        assert_eq!(source.tx_count(&BlockNumber::from(3u32)), 5);
        assert_eq!(source.tx_count(&BlockNumber::from(4u32)), 1);
    }

    #[test]
    fn recorded_counts_default_to_zero() {
        let mut recorded = RecordedTxCounts::new();
        assert!(recorded.is_empty());
        recorded.record(BlockNumber::from(7u32), 12);
        recorded.record(BlockNumber::from(7u32), 13);
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded.tx_count(&BlockNumber::from(7u32)), 13);
        assert_eq!(recorded.tx_count(&BlockNumber::from(8u32)), 0);
    }
}
