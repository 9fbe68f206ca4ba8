use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::sh::{ShOptions, StreamMode};
use crate::Result;

#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Path to YAML config (defaults to `<workspace>/matrix.yaml`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Which command to run. This can be either:
    /// - a name from `commands:` (recommended), or
    /// - an inline command template string.
    ///
    /// Per-entry `command:` overrides this.
    #[arg(long)]
    pub command: Option<String>,

    /// Only run matrix entries for these packages (repeatable).
    ///
    /// Example: `cargo run -p xtask -- matrix -p harmonic-kernel --command test`
    #[arg(short = 'p', long = "package")]
    pub packages: Vec<String>,

    /// Print commands as they run
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, serde::Deserialize)]
struct MatrixConfig {
    #[serde(default)]
    pre: Vec<String>,
    #[serde(default)]
    commands: BTreeMap<String, String>,
    entries: Vec<MatrixEntry>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum FeatureSpec {
    /// Always enabled.
    One(String),
    /// Exactly one of these per combination; `""` means none.
    OneOf(Vec<String>),
}

#[derive(Debug, serde::Deserialize)]
struct MatrixEntry {
    /// Per-entry overrides for named commands from the top-level `commands:` map.
    #[serde(default)]
    commands: BTreeMap<String, String>,
    command: Option<String>,
    package: String,
    /// Build-time environment, e.g. `HARMONIC_WORKERS: "8"`.
    #[serde(default)]
    env: BTreeMap<String, String>,
    #[serde(default)]
    features: Vec<FeatureSpec>,
}

fn load_config(path: &Path) -> Result<MatrixConfig> {
    let bytes = std::fs::read(path)?;
    Ok(serde_yaml::from_slice(&bytes)?)
}

#[derive(Debug)]
struct Step {
    name: String,
    cmd: String,
    env: Vec<(String, String)>,
}

fn render_template(
    template: &str,
    workspace: &Path,
    package: &str,
    features: &str,
    features_flag: &str,
) -> String {
    template
        .replace("{workspace}", &workspace.to_string_lossy())
        .replace("{package}", package)
        .replace("{features}", features)
        .replace("{features_flag}", features_flag)
}

/// Cartesian product of the feature specs, each combination sorted and deduplicated.
fn feature_combos(specs: &[FeatureSpec]) -> Vec<Vec<String>> {
    let mut combos: Vec<Vec<String>> = vec![Vec::new()];
    for spec in specs {
        match spec {
            FeatureSpec::One(f) => {
                for c in &mut combos {
                    c.push(f.clone());
                }
            }
            FeatureSpec::OneOf(group) => {
                let mut next: Vec<Vec<String>> = Vec::new();
                for opt in group {
                    for c in &combos {
                        let mut nc = c.clone();
                        if !opt.is_empty() {
                            nc.push(opt.clone());
                        }
                        next.push(nc);
                    }
                }
                combos = next;
            }
        }
    }

    for c in &mut combos {
        c.sort();
        c.dedup();
    }
    combos
}

fn plan(
    cfg: &MatrixConfig,
    workspace: &Path,
    default_cmd: Option<&String>,
    packages: &[String],
) -> Result<Vec<Step>> {
    let mut steps: Vec<Step> = Vec::new();

    for (i, cmd) in cfg.pre.iter().enumerate() {
        steps.push(Step {
            name: format!("pre:{}", i + 1),
            cmd: cmd.clone(),
            env: Vec::new(),
        });
    }

    for entry in &cfg.entries {
        if !packages.is_empty() && !packages.iter().any(|p| p == &entry.package) {
            continue;
        }

        let cmd_name = entry
            .command
            .as_ref()
            .or(default_cmd)
            .ok_or("no command selected (pass --command <name> or set `command:` per entry)")?;
        let template: &str = entry
            .commands
            .get(cmd_name)
            .or_else(|| cfg.commands.get(cmd_name))
            .map(|s| s.as_str())
            .unwrap_or(cmd_name);

        let combos = feature_combos(&entry.features);
        let total = combos.len();
        let env: Vec<(String, String)> = entry
            .env
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (idx, feats) in combos.iter().enumerate() {
            let feat_str = feats.join(",");
            let features_flag = if feat_str.is_empty() {
                String::new()
            } else {
                format!(r##"--features "{feat_str}""##)
            };

            let cmd = render_template(template, workspace, &entry.package, &feat_str, &features_flag);

            let suffix = if total > 1 {
                format!(" #{}/{}", idx + 1, total)
            } else {
                String::new()
            };
            let shown = if feat_str.is_empty() { "-" } else { feat_str.as_str() };

            steps.push(Step {
                name: format!("{} [{shown}] ({cmd_name}){suffix}", entry.package),
                cmd,
                env: env.clone(),
            });
        }
    }

    Ok(steps)
}

pub fn run(args: MatrixArgs) -> Result<()> {
    let workspace = crate::findup::workspace_root()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| workspace.join("matrix.yaml"));
    let cfg = load_config(&config_path)?;

    let steps = plan(&cfg, &workspace, args.command.as_ref(), &args.packages)?;

    for (i, step) in steps.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, steps.len(), step.name);

        let opts = ShOptions {
            stdout: StreamMode::Inherit,
            stderr: StreamMode::Inherit,
            cwd: Some(workspace.clone()),
            env: step.env.clone(),
            quiet: !args.verbose,
        };
        crate::sh!(options(opts), &step.cmd)?;
    }

    println!("[matrix] done");
    Ok(())
}
