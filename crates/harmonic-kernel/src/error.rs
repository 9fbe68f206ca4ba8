use core::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Term count outside `1..=i64::MAX`.
    InvalidTerms { terms: u64 },
    /// Worker count outside `1..=terms`.
    InvalidWorkers { workers: usize, terms: u64 },
    /// A build-time setting that does not parse.
    InvalidSetting {
        name: &'static str,
        value: &'static str,
    },
    /// The worker pool could not be created.
    WorkerPool(rayon::ThreadPoolBuildError),
}

impl Error {
    pub fn is_config(&self) -> bool {
        !matches!(self, Error::WorkerPool(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTerms { terms } => {
                write!(f, "invalid term count {terms}: expected 1 <= N <= {}", i64::MAX)
            }
            Error::InvalidWorkers { workers, terms } => {
                write!(f, "invalid worker count {workers}: expected 1 <= K <= N ({terms})")
            }
            Error::InvalidSetting { name, value } => {
                write!(f, "invalid build setting {name}={value:?}: expected a positive integer")
            }
            Error::WorkerPool(_) => f.write_str("failed to create worker pool"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::WorkerPool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Error::WorkerPool(e)
    }
}

/// Check `1 <= terms <= i64::MAX`.
pub(crate) fn check_terms(terms: u64) -> Result<()> {
    if terms == 0 || terms > i64::MAX as u64 {
        return Err(Error::InvalidTerms { terms });
    }
    Ok(())
}

/// Check `1 <= workers <= terms`. Assumes `terms` already passed [`check_terms`].
pub(crate) fn check_workers(terms: u64, workers: usize) -> Result<()> {
    if workers == 0 || workers as u64 > terms {
        return Err(Error::InvalidWorkers { workers, terms });
    }
    Ok(())
}
