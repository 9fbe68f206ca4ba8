use crate::error::Result;
use crate::parallel::{compute_parallel, Reduction};
use crate::sequential::compute_sequential;

/// Entry table for one summation kernel.
#[derive(Clone, Copy)]
pub struct KernelOps {
    pub name: &'static str,
    /// `None` for the sequential kernel.
    pub reduction: Option<Reduction>,
    pub compute: fn(terms: u64, workers: usize) -> Result<f64>,
}

impl core::fmt::Debug for KernelOps {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KernelOps")
            .field("name", &self.name)
            .field("reduction", &self.reduction)
            .finish()
    }
}

fn sequential(terms: u64, _workers: usize) -> Result<f64> {
    compute_sequential(terms)
}

fn parallel_slots(terms: u64, workers: usize) -> Result<f64> {
    compute_parallel(terms, workers, Reduction::Slots)
}

fn parallel_atomic(terms: u64, workers: usize) -> Result<f64> {
    compute_parallel(terms, workers, Reduction::Atomic)
}

pub const SEQUENTIAL_OPS: KernelOps = KernelOps {
    name: "sequential",
    reduction: None,
    compute: sequential,
};

pub const PARALLEL_SLOTS_OPS: KernelOps = KernelOps {
    name: "parallel-slots",
    reduction: Some(Reduction::Slots),
    compute: parallel_slots,
};

pub const PARALLEL_ATOMIC_OPS: KernelOps = KernelOps {
    name: "parallel-atomic",
    reduction: Some(Reduction::Atomic),
    compute: parallel_atomic,
};

cfg_if::cfg_if! {
    if #[cfg(feature = "atomic-reduction")] {
        pub const KERNEL_OPS: KernelOps = PARALLEL_ATOMIC_OPS;
    } else if #[cfg(feature = "parallel")] {
        pub const KERNEL_OPS: KernelOps = PARALLEL_SLOTS_OPS;
    } else {
        pub const KERNEL_OPS: KernelOps = SEQUENTIAL_OPS;
    }
}
