//! Harmonic series summation demo.
//!
//! Prints H(N) to 20 fractional digits and the time taken. N, K and the
//! mode are fixed when the binary is built.

use anyhow::Context;
use harmonic_kernel::Config;
use harmonic_sum::{banner, run, validate};

fn main() {
    env_logger::init();

    if let Err(e) = try_main() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let config = Config::build_time().context("failed to read build-time configuration")?;
    log::debug!("[harmonic-sum] {:?}", config);
    validate(&config)?;

    print!("{}", banner(&config));
    let report = run(&config)?;
    print!("{}", report.render());
    Ok(())
}
