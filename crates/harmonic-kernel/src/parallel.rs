//! Task-parallel reducer.
//!
//! The calling thread is the only producer: it opens a scope on a pool of K
//! workers, spawns one task per block and blocks at the end of the scope
//! until every task has finished. It never runs block tasks itself.
//!
//! Partial sums are combined one of two ways:
//! - [`Reduction::Slots`]: each task owns one output slot; the producer folds
//!   the slots in block order after the join. Deterministic per (N, K).
//! - [`Reduction::Atomic`]: each task adds into one shared [`AtomicF64`].
//!   No update is lost, but the order of adds varies between runs.

use core::fmt;
use core::num::NonZeroUsize;
use core::sync::atomic::{AtomicU64, Ordering};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{check_terms, check_workers, Error, Result};
use crate::partition::Partition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reduction {
    #[default]
    Slots,
    Atomic,
}

impl Reduction {
    pub const fn name(&self) -> &'static str {
        match self {
            Reduction::Slots => "slots",
            Reduction::Atomic => "atomic",
        }
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An `f64` stored as its bit pattern in an [`AtomicU64`].
#[derive(Debug)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Add `value` and return the previous value.
    pub fn fetch_add(&self, value: f64) -> f64 {
        loop {
            let current = self.bits.load(Ordering::Acquire);
            let next = (f64::from_bits(current) + value).to_bits();

            if self
                .bits
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return f64::from_bits(current);
            }
        }
    }

    pub fn into_inner(self) -> f64 {
        f64::from_bits(self.bits.into_inner())
    }
}

pub struct ParallelReducer {
    pool: ThreadPool,
    workers: NonZeroUsize,
    reduction: Reduction,
}

impl ParallelReducer {
    /// Build a pool of exactly `workers` threads.
    pub fn new(workers: NonZeroUsize, reduction: Reduction) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(|i| format!("harmonic-worker-{i}"))
            .build()?;

        log::debug!("parallel: pool ready, K={} reduction={}", workers, reduction);
        Ok(Self {
            pool,
            workers,
            reduction,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    /// H(`terms`) with one block per worker. Requires `1 <= K <= terms`.
    pub fn compute(&self, terms: u64) -> Result<f64> {
        let partition = Partition::new(terms, self.workers.get())?;
        log::debug!(
            "parallel: N={} K={} block_len={} reduction={}",
            terms,
            partition.len(),
            partition.block_len(),
            self.reduction
        );

        let sum = match self.reduction {
            Reduction::Slots => self.reduce_slots(&partition),
            Reduction::Atomic => self.reduce_atomic(&partition),
        };
        Ok(sum)
    }

    fn reduce_slots(&self, partition: &Partition) -> f64 {
        let mut slots = vec![0.0f64; partition.len()];

        self.pool.in_place_scope(|scope| {
            for (k, (slot, block)) in slots.iter_mut().zip(partition).enumerate() {
                scope.spawn(move |_| {
                    *slot = block.sum();
                    log::trace!(
                        "block {} [{}, {}] partial={:e}",
                        k,
                        block.start(),
                        block.end(),
                        *slot
                    );
                });
            }
        });

        slots.iter().fold(0.0, |global, &partial| global + partial)
    }

    fn reduce_atomic(&self, partition: &Partition) -> f64 {
        let global = AtomicF64::new(0.0);

        self.pool.in_place_scope(|scope| {
            for (k, block) in partition.iter().enumerate() {
                let global = &global;
                scope.spawn(move |_| {
                    let partial = block.sum();
                    global.fetch_add(partial);
                    log::trace!(
                        "block {} [{}, {}] partial={:e}",
                        k,
                        block.start(),
                        block.end(),
                        partial
                    );
                });
            }
        });

        global.into_inner()
    }
}

impl fmt::Debug for ParallelReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParallelReducer")
            .field("workers", &self.workers)
            .field("reduction", &self.reduction)
            .finish()
    }
}

/// Validate (N, K), build a reducer and compute H(`terms`).
pub fn compute_parallel(terms: u64, workers: usize, reduction: Reduction) -> Result<f64> {
    check_terms(terms)?;
    check_workers(terms, workers)?;
    let workers = NonZeroUsize::new(workers).ok_or(Error::InvalidWorkers { workers, terms })?;

    ParallelReducer::new(workers, reduction)?.compute(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::accumulate;

    fn reducer(workers: usize, reduction: Reduction) -> ParallelReducer {
        ParallelReducer::new(NonZeroUsize::new(workers).unwrap(), reduction).unwrap()
    }

    #[test]
    fn test_atomic_f64_fetch_add() {
        let a = AtomicF64::new(0.0);
        assert_eq!(a.fetch_add(1.5), 0.0);
        assert_eq!(a.fetch_add(0.25), 1.5);
        assert_eq!(a.load(), 1.75);
        assert_eq!(a.into_inner(), 1.75);
    }

    #[test]
    fn test_atomic_f64_no_lost_update() {
        let a = AtomicF64::new(0.0);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        a.fetch_add(1.0);
                    }
                });
            }
        });
        assert_eq!(a.load(), 8000.0);
    }

    #[test]
    fn test_slots_fold_in_block_order() {
        let terms = 10_000;
        let partition = Partition::new(terms, 4).unwrap();
        let expected = partition
            .iter()
            .fold(0.0, |global, block| global + block.sum());

        let sum = reducer(4, Reduction::Slots).compute(terms).unwrap();
        assert_eq!(sum.to_bits(), expected.to_bits());
    }

    #[test]
    fn test_single_worker_matches_accumulator() {
        for reduction in [Reduction::Slots, Reduction::Atomic] {
            let sum = reducer(1, reduction).compute(1000).unwrap();
            assert_eq!(sum.to_bits(), accumulate(1, 1000).to_bits());
        }
    }

    #[test]
    fn test_reducer_is_reusable() {
        let r = reducer(3, Reduction::Slots);
        let first = r.compute(5000).unwrap();
        let second = r.compute(5000).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(r.workers(), 3);
        assert_eq!(r.reduction(), Reduction::Slots);
    }

    #[test]
    fn test_more_workers_than_terms() {
        let r = reducer(4, Reduction::Atomic);
        assert!(matches!(
            r.compute(3),
            Err(Error::InvalidWorkers { workers: 4, terms: 3 })
        ));
    }

    #[test]
    fn test_compute_parallel_validates() {
        assert!(matches!(
            compute_parallel(0, 1, Reduction::Slots),
            Err(Error::InvalidTerms { terms: 0 })
        ));
        assert!(matches!(
            compute_parallel(10, 0, Reduction::Slots),
            Err(Error::InvalidWorkers { workers: 0, .. })
        ));
    }
}
