//! Block accumulator.
//!
//! Sums 1/i over a closed index range from the top index down, so the
//! smallest reciprocals are added first. The loop order fixes the result bit
//! for bit; nothing here may reorder it.

/// 1/i in double precision.
#[inline(always)]
pub fn reciprocal(i: u64) -> f64 {
    1.0 / i as f64
}

/// Sum 1/i for i in `[start, end]`, iterating from `end` down to `start`.
///
/// Returns +0.0 when `end < start`. Requires `start >= 1` otherwise.
pub fn accumulate(start: u64, end: u64) -> f64 {
    let mut sum = 0.0f64;
    if end < start {
        return sum;
    }
    debug_assert!(start >= 1, "term indices start at 1");

    for i in (start..=end).rev() {
        sum += reciprocal(i);
    }
    sum
}

/// A closed range `[start, end]` of term indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    start: u64,
    end: u64,
}

impl Block {
    /// Only [`Partition`](crate::Partition) hands out blocks, always with `start >= 1`.
    pub(crate) const fn new(start: u64, end: u64) -> Self {
        debug_assert!(start >= 1);
        Self { start, end }
    }

    #[inline]
    pub const fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// Number of terms; zero for an inverted range.
    pub const fn len(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, i: u64) -> bool {
        self.start <= i && i <= self.end
    }

    /// Partial sum of this block.
    pub fn sum(&self) -> f64 {
        accumulate(self.start, self.end)
    }
}
