use harmonic_kernel::{Config, Error, Mode, Reduction};
use harmonic_sum::{banner, run};

fn parallel(terms: u64, workers: usize) -> Config {
    Config::new(
        terms,
        Mode::Parallel {
            workers,
            reduction: Reduction::Slots,
        },
    )
}

#[test]
fn test_run_sequential_report() {
    let report = run(&Config::new(4, Mode::Sequential)).unwrap();
    let text = report.render();

    assert!(text.contains("Computation completed!\n"));
    assert!(text.contains("Result: 2.08333333333333303727\n"));

    let timing = text
        .lines()
        .find(|l| l.starts_with("Execution time: "))
        .unwrap();
    let secs: f64 = timing
        .trim_start_matches("Execution time: ")
        .trim_end_matches(" seconds")
        .parse()
        .unwrap();
    assert!(secs >= 0.0);
}

#[test]
fn test_run_parallel_report() {
    let report = run(&parallel(1, 1)).unwrap();
    assert!(report.render().contains("Result: 1.00000000000000000000\n"));

    let report = run(&parallel(10_000, 4)).unwrap();
    let seq = run(&Config::new(10_000, Mode::Sequential)).unwrap();
    assert!((report.result - seq.result).abs() < 1e-12);
}

#[test]
fn test_run_rejects_bad_config() {
    let err = run(&parallel(3, 4)).unwrap_err();
    let kernel = err.downcast_ref::<Error>().unwrap();
    assert!(matches!(kernel, Error::InvalidWorkers { workers: 4, terms: 3 }));
    assert!(format!("{:#}", err).starts_with("invalid harmonic sum configuration: "));
}

#[test]
fn test_banner_layout() {
    let text = banner(&parallel(10_000_000, 4));
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "================================================",
            "Harmonic Series Summation",
            "================================================",
            "Number of terms (N): 10000000",
            "Mode: Parallel (task pool)",
            "Number of threads: 4",
            "Reduction: slots",
            "================================================",
        ]
    );
}
