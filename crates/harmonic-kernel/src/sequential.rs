use crate::block::accumulate;
use crate::error::{check_terms, Result};

/// H(`terms`) as one descending pass over [1, N] on the calling thread.
pub fn compute_sequential(terms: u64) -> Result<f64> {
    check_terms(terms)?;
    log::debug!("sequential: N={}", terms);
    Ok(accumulate(1, terms))
}
