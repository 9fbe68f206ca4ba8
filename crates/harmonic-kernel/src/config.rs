//! Build-time configuration and mode selection.
//!
//! The mode comes from cargo features (`parallel`, `atomic-reduction`). N and
//! K default to [`DEFAULT_TERMS`] and [`DEFAULT_WORKERS`] and can be set at
//! compile time through `HARMONIC_TERMS` and `HARMONIC_WORKERS`. Nothing is
//! read from the environment at run time.

use core::fmt;
use core::str::FromStr;

use crate::error::{check_terms, check_workers, Error, Result};
use crate::ops::{KernelOps, KERNEL_OPS, PARALLEL_ATOMIC_OPS, PARALLEL_SLOTS_OPS, SEQUENTIAL_OPS};
use crate::parallel::Reduction;

pub const DEFAULT_TERMS: u64 = 10_000_000;
pub const DEFAULT_WORKERS: usize = 4;

const TERMS_SETTING: Option<&str> = option_env!("HARMONIC_TERMS");
const WORKERS_SETTING: Option<&str> = option_env!("HARMONIC_WORKERS");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sequential,
    Parallel { workers: usize, reduction: Reduction },
}

impl Mode {
    /// The mode compiled into this build.
    pub fn configured() -> Result<Self> {
        match KERNEL_OPS.reduction {
            None => Ok(Mode::Sequential),
            Some(reduction) => Ok(Mode::Parallel {
                workers: parse_setting("HARMONIC_WORKERS", WORKERS_SETTING, DEFAULT_WORKERS)?,
                reduction,
            }),
        }
    }

    pub fn ops(&self) -> &'static KernelOps {
        match self {
            Mode::Sequential => &SEQUENTIAL_OPS,
            Mode::Parallel {
                reduction: Reduction::Slots,
                ..
            } => &PARALLEL_SLOTS_OPS,
            Mode::Parallel {
                reduction: Reduction::Atomic,
                ..
            } => &PARALLEL_ATOMIC_OPS,
        }
    }

    pub fn workers(&self) -> Option<usize> {
        match self {
            Mode::Sequential => None,
            Mode::Parallel { workers, .. } => Some(*workers),
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self, Mode::Parallel { .. })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Sequential => f.write_str("Sequential"),
            Mode::Parallel { .. } => f.write_str("Parallel (task pool)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub terms: u64,
    pub mode: Mode,
}

impl Config {
    pub const fn new(terms: u64, mode: Mode) -> Self {
        Self { terms, mode }
    }

    /// Configuration fixed at compile time.
    pub fn build_time() -> Result<Self> {
        Ok(Self {
            terms: parse_setting("HARMONIC_TERMS", TERMS_SETTING, DEFAULT_TERMS)?,
            mode: Mode::configured()?,
        })
    }

    pub fn with_terms(self, terms: u64) -> Self {
        Self { terms, ..self }
    }

    /// Check `N >= 1` and, in parallel mode, `1 <= K <= N`.
    pub fn validate(&self) -> Result<()> {
        check_terms(self.terms)?;
        if let Some(workers) = self.mode.workers() {
            check_workers(self.terms, workers)?;
        }
        Ok(())
    }

    pub fn compute(&self) -> Result<f64> {
        self.validate()?;

        let ops = self.mode.ops();
        let workers = self.mode.workers().unwrap_or(1);
        log::debug!("compute: kernel={} N={} K={}", ops.name, self.terms, workers);
        (ops.compute)(self.terms, workers)
    }
}

fn parse_setting<T: FromStr>(name: &'static str, value: Option<&'static str>, default: T) -> Result<T> {
    let Some(value) = value else {
        return Ok(default);
    };

    value
        .trim()
        .replace('_', "")
        .parse()
        .map_err(|_| Error::InvalidSetting { name, value })
}
