use clap::Args;

use crate::Result;

/// Tidy and verify packages: cargo fix, clippy, fmt, check and test
#[derive(Args, Debug)]
pub struct MassageArgs {
    #[command(flatten)]
    workspace: clap_cargo::Workspace,

    /// Also check and test with every kernel mode feature enabled
    #[arg(long)]
    pub all_features: bool,

    /// Enable verbose output (show warnings)
    #[arg(long = "verbose")]
    pub verbose: bool,
}

fn target_flags(workspace: &clap_cargo::Workspace) -> String {
    if workspace.workspace || workspace.package.is_empty() {
        "--workspace".to_string()
    } else {
        workspace
            .package
            .iter()
            .map(|p| format!("-p {p}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn script(target_flags: &str, all_features: bool) -> String {
    let feature_flags = if all_features { " --all-features" } else { "" };

    format!(
        r#"
set -e

echo [1/5] Running cargo fix...
cargo fix --allow-dirty --allow-staged --quiet {target_flags}

echo [2/5] Running cargo clippy --fix...
cargo clippy --fix --allow-dirty --allow-staged --quiet {target_flags}{feature_flags}

echo [3/5] Running cargo fmt...
cargo fmt --all --quiet

echo [4/5] Running cargo check...
cargo check --quiet {target_flags}{feature_flags}

echo [5/5] Running cargo test...
RUST_BACKTRACE=1 cargo nextest run --no-tests pass {target_flags}{feature_flags}
"#
    )
}

pub fn run(args: MassageArgs) -> Result<()> {
    let script = script(&target_flags(&args.workspace), args.all_features);

    let opts = crate::sh::ShOptions {
        cwd: Some(crate::findup::workspace_root()?),
        quiet: !args.verbose,
        ..Default::default()
    };
    crate::sh!(options(opts), script)?;
    Ok(())
}
