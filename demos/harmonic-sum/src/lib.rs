//! Report glue for the harmonic sum demo.
//!
//! Runs the configured kernel once, times it with a monotonic clock and
//! renders the banner and result block printed by the binary.

use std::time::{Duration, Instant};

use anyhow::Context;
use harmonic_kernel::{Config, Mode};

const RULE: &str = "================================================";

/// Outcome of one timed run.
#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub config: Config,
    pub result: f64,
    pub elapsed: Duration,
}

/// Reject a configuration before anything is printed.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    config
        .validate()
        .context("invalid harmonic sum configuration")
}

/// Compute H(N) for `config`, timing only the compute call.
pub fn run(config: &Config) -> anyhow::Result<Report> {
    validate(config)?;

    let start = Instant::now();
    let result = config
        .compute()
        .with_context(|| format!("{} kernel failed", config.mode.ops().name))?;
    let elapsed = start.elapsed();

    log::debug!("run: result={:e} elapsed={:?}", result, elapsed);
    Ok(Report {
        config: *config,
        result,
        elapsed,
    })
}

/// Fixed-point with exactly 20 fractional digits.
pub fn format_result(result: f64) -> String {
    format!("{:.20}", result)
}

pub fn banner(config: &Config) -> String {
    let threads = match config.mode {
        Mode::Sequential => String::new(),
        Mode::Parallel { workers, reduction } => {
            format!("Number of threads: {workers}\nReduction: {reduction}\n")
        }
    };

    format!(
        "{RULE}\n\
         Harmonic Series Summation\n\
         {RULE}\n\
         Number of terms (N): {terms}\n\
         Mode: {mode}\n\
         {threads}\
         {RULE}\n",
        terms = config.terms,
        mode = config.mode,
    )
}

impl Report {
    pub fn render(&self) -> String {
        format!(
            "\n\
             Computation completed!\n\
             Execution time: {:.9} seconds\n\
             Result: {}\n\
             {RULE}\n",
            self.elapsed.as_secs_f64(),
            format_result(self.result),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harmonic_kernel::Reduction;

    #[test]
    fn test_format_result() {
        assert_eq!(format_result(1.0), "1.00000000000000000000");
        assert_eq!(format_result(1.5), "1.50000000000000000000");
        assert_eq!(format_result(0.1), "0.10000000000000000555");
    }

    #[test]
    fn test_banner_sequential() {
        let text = banner(&Config::new(10, Mode::Sequential));
        assert!(text.contains("Number of terms (N): 10\n"));
        assert!(text.contains("Mode: Sequential\n"));
        assert!(!text.contains("Number of threads"));
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let config = Config::new(
            10,
            Mode::Parallel {
                workers: 0,
                reduction: Reduction::Slots,
            },
        );
        let err = validate(&config).unwrap_err();
        assert!(format!("{:#}", err).starts_with("invalid harmonic sum configuration: "));
        assert!(validate(&Config::new(10, Mode::Sequential)).is_ok());
    }

    #[test]
    fn test_render_layout() {
        let report = Report {
            config: Config::new(1, Mode::Sequential),
            result: 1.0,
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(
            report.render(),
            format!(
                "\nComputation completed!\n\
                 Execution time: 1.500000000 seconds\n\
                 Result: 1.00000000000000000000\n\
                 {RULE}\n"
            )
        );
    }

    #[test]
    fn test_banner_parallel() {
        let config = Config::new(
            100,
            Mode::Parallel {
                workers: 4,
                reduction: Reduction::Atomic,
            },
        );
        let text = banner(&config);
        assert!(text.contains("Mode: Parallel (task pool)\n"));
        assert!(text.contains("Number of threads: 4\n"));
        assert!(text.contains("Reduction: atomic\n"));
    }
}
