//! Range partitioner.
//!
//! Splits [1, N] into K contiguous blocks of ⌊N/K⌋ terms each, in ascending
//! order. The last block also takes the N mod K remainder.

use crate::block::Block;
use crate::error::{check_terms, check_workers, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    terms: u64,
    blocks: usize,
    block_len: u64,
}

impl Partition {
    /// Partition [1, `terms`] into `blocks` blocks.
    ///
    /// Requires `1 <= blocks <= terms`.
    pub fn new(terms: u64, blocks: usize) -> Result<Self> {
        check_terms(terms)?;
        check_workers(terms, blocks)?;

        Ok(Self {
            terms,
            blocks,
            block_len: terms / blocks as u64,
        })
    }

    pub fn terms(&self) -> u64 {
        self.terms
    }

    /// Number of blocks (K).
    pub fn len(&self) -> usize {
        self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks == 0
    }

    /// ⌊N/K⌋, the length of every block but the last.
    pub fn block_len(&self) -> u64 {
        self.block_len
    }

    pub fn block(&self, k: usize) -> Option<Block> {
        if k >= self.blocks {
            return None;
        }

        let k = k as u64;
        let start = k * self.block_len + 1;
        let end = if k == self.blocks as u64 - 1 {
            self.terms
        } else {
            (k + 1) * self.block_len
        };
        Some(Block::new(start, end))
    }

    pub fn iter(&self) -> Blocks {
        Blocks {
            partition: *self,
            next: 0,
        }
    }
}

impl IntoIterator for Partition {
    type Item = Block;
    type IntoIter = Blocks;

    fn into_iter(self) -> Blocks {
        self.iter()
    }
}

impl IntoIterator for &Partition {
    type Item = Block;
    type IntoIter = Blocks;

    fn into_iter(self) -> Blocks {
        self.iter()
    }
}

/// Blocks of a [`Partition`] in ascending index order.
#[derive(Debug, Clone)]
pub struct Blocks {
    partition: Partition,
    next: usize,
}

impl Iterator for Blocks {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let block = self.partition.block(self.next)?;
        self.next += 1;
        Some(block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.partition.blocks - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Blocks {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_even_split() {
        let p = Partition::new(12, 4).unwrap();
        let blocks: Vec<_> = p.iter().collect();
        assert_eq!(
            blocks,
            [
                Block::new(1, 3),
                Block::new(4, 6),
                Block::new(7, 9),
                Block::new(10, 12)
            ]
        );
    }

    #[test]
    fn test_remainder_in_last_block() {
        let p = Partition::new(10, 3).unwrap();
        assert_eq!(p.block_len(), 3);
        let blocks: Vec<_> = p.into_iter().collect();
        assert_eq!(
            blocks,
            [Block::new(1, 3), Block::new(4, 6), Block::new(7, 10)]
        );
    }

    #[test]
    fn test_single_block() {
        let p = Partition::new(7, 1).unwrap();
        assert_eq!(p.iter().collect::<Vec<_>>(), [Block::new(1, 7)]);
    }

    #[test]
    fn test_unit_blocks() {
        let p = Partition::new(5, 5).unwrap();
        for (k, block) in p.iter().enumerate() {
            let i = k as u64 + 1;
            assert_eq!(block, Block::new(i, i));
        }
    }

    #[test]
    fn test_exact_size() {
        let p = Partition::new(100, 7).unwrap();
        let mut it = p.iter();
        assert_eq!(it.len(), 7);
        it.next();
        assert_eq!(it.len(), 6);
        assert_eq!(p.block(7), None);
    }

    #[test]
    fn test_largest_term_count() {
        let terms = i64::MAX as u64;
        let p = Partition::new(terms, 3).unwrap();
        let blocks: Vec<_> = p.iter().collect();

        assert_eq!(blocks[0].start(), 1);
        assert_eq!(blocks[2].end(), terms);
        assert_eq!(blocks.iter().map(Block::len).sum::<u64>(), terms);
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].end() + 1, pair[1].start());
        }
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(Partition::new(0, 1), Err(Error::InvalidTerms { .. })));
        assert!(matches!(Partition::new(4, 0), Err(Error::InvalidWorkers { .. })));
        assert!(matches!(Partition::new(4, 5), Err(Error::InvalidWorkers { .. })));
    }
}
