//! Harmonic series summation kernels.
//!
//! H(N) = 1/1 + 1/2 + ... + 1/N is accumulated in descending index order so
//! that the smallest addends enter a near-zero accumulator first. The
//! parallel kernel splits [1, N] into one contiguous block per worker, sums
//! each block the same way, and combines the partial sums after a join.

pub mod block;
pub mod config;
pub mod error;
pub mod ops;
pub mod parallel;
pub mod partition;
pub mod sequential;

pub use block::{accumulate, reciprocal, Block};
pub use config::{Config, Mode, DEFAULT_TERMS, DEFAULT_WORKERS};
pub use error::{Error, Result};
pub use ops::{KernelOps, KERNEL_OPS, PARALLEL_ATOMIC_OPS, PARALLEL_SLOTS_OPS, SEQUENTIAL_OPS};
pub use parallel::{compute_parallel, AtomicF64, ParallelReducer, Reduction};
pub use partition::{Blocks, Partition};
pub use sequential::compute_sequential;

/// Compute H(`terms`) with the mode selected at build time.
pub fn compute(terms: u64) -> Result<f64> {
    Config::new(terms, Mode::configured()?).compute()
}
