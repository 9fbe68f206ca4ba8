use clap::Args;

use crate::sh::{ShOptionsBuilder, StreamMode};
use crate::Result;

/// Run harmonic-sum in every mode and check the parallel results against the sequential one
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Build in release mode
    #[arg(long)]
    pub release: bool,

    /// Largest accepted |parallel - sequential|
    #[arg(long, default_value_t = 1e-12)]
    pub tolerance: f64,

    /// Build-time worker count (`HARMONIC_WORKERS`)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Build-time term count (`HARMONIC_TERMS`)
    #[arg(long)]
    pub terms: Option<u64>,
}

const MODES: [(&str, &str); 3] = [
    ("sequential", ""),
    ("parallel", "--features parallel"),
    ("parallel-atomic", "--features atomic-reduction"),
];

/// Pull `(result, seconds)` out of the demo's report.
fn parse_report(stdout: &str) -> Result<(f64, f64)> {
    let mut result = None;
    let mut seconds = None;

    for line in stdout.lines() {
        if let Some(v) = line.strip_prefix("Result: ") {
            result = Some(v.trim().parse::<f64>()?);
        } else if let Some(v) = line.strip_prefix("Execution time: ") {
            seconds = Some(v.trim_end_matches(" seconds").trim().parse::<f64>()?);
        }
    }

    match (result, seconds) {
        (Some(r), Some(s)) => Ok((r, s)),
        _ => Err("harmonic-sum output is missing the Result or Execution time line".into()),
    }
}

pub fn run(args: CompareArgs) -> Result<()> {
    let workspace = crate::findup::workspace_root()?;

    let mut env = Vec::new();
    if let Some(k) = args.workers {
        env.push(("HARMONIC_WORKERS".to_string(), k.to_string()));
    }
    if let Some(n) = args.terms {
        env.push(("HARMONIC_TERMS".to_string(), n.to_string()));
    }

    let opts = ShOptionsBuilder::default()
        .stdout(StreamMode::Pipe)
        .stderr(StreamMode::Pipe)
        .cwd(Some(workspace))
        .env(env)
        .quiet(true)
        .build()?;

    let profile = if args.release { " --release" } else { "" };
    let mut baseline: Option<f64> = None;
    let mut failed = Vec::new();

    for (name, features) in MODES {
        let cmd = format!("cargo run --quiet{profile} --package harmonic-sum {features}");
        let out = crate::sh!(options(opts.clone()), cmd)?;
        debug_assert!(out.status.success());
        if !out.stderr.is_empty() {
            log::debug!("[compare] {name} stderr:\n{}", out.stderr);
        }
        let (result, seconds) = parse_report(&out.stdout)?;

        let delta = baseline.map(|b| (result - b).abs()).unwrap_or(0.0);
        println!("{name:>16}: {result:.20}  ({seconds:.6}s, |delta|={delta:e})");

        match baseline {
            None => baseline = Some(result),
            Some(_) if delta > args.tolerance => failed.push(name),
            Some(_) => {}
        }
    }

    if !failed.is_empty() {
        return Err(format!(
            "results differ from sequential by more than {:e}: {}",
            args.tolerance,
            failed.join(", ")
        )
        .into());
    }

    println!("[compare] all modes within {:e}", args.tolerance);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let stdout = "\
Mode: Sequential
================================================

Computation completed!
Execution time: 0.012345678 seconds
Result: 16.69531136585996478061
================================================
";
        let (result, seconds) = parse_report(stdout).unwrap();
        assert!((result - 16.695311365859965).abs() < 1e-15);
        assert!((seconds - 0.012345678).abs() < 1e-12);
    }

    #[test]
    fn test_parse_report_missing_result() {
        assert!(parse_report("Execution time: 1.0 seconds\n").is_err());
    }
}
