// sh! command execution

use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use derive_builder::Builder;

use crate::Result;

/// Trait for types that can configure a `Command` before execution.
pub trait ShConfig {
    /// Apply configuration to the given `Command`.
    fn apply(&self, cmd: &mut Command);

    /// Suppress the command echo.
    fn quiet(&self) -> bool {
        false
    }
}

impl<T: ShConfig + ?Sized> ShConfig for &T {
    fn apply(&self, cmd: &mut Command) {
        (*self).apply(cmd)
    }

    fn quiet(&self) -> bool {
        (*self).quiet()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    Inherit,
    Pipe,
    Null,
}

impl StreamMode {
    fn stdio(self) -> Stdio {
        match self {
            StreamMode::Inherit => Stdio::inherit(),
            StreamMode::Pipe => Stdio::piped(),
            StreamMode::Null => Stdio::null(),
        }
    }
}

#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct ShOptions {
    pub stdout: StreamMode,
    pub stderr: StreamMode,
    pub cwd: Option<PathBuf>,
    /// Extra environment for the child, e.g. build-time `HARMONIC_*` settings.
    pub env: Vec<(String, String)>,
    pub quiet: bool,
}

impl Default for ShOptions {
    fn default() -> Self {
        Self {
            stdout: StreamMode::Inherit,
            stderr: StreamMode::Inherit,
            cwd: None,
            env: Vec::new(),
            quiet: false,
        }
    }
}

impl ShConfig for ShOptions {
    fn apply(&self, cmd: &mut Command) {
        cmd.stdout(self.stdout.stdio());
        cmd.stderr(self.stderr.stdio());

        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
    }

    fn quiet(&self) -> bool {
        self.quiet
    }
}

#[derive(Debug)]
pub struct ShOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

#[macro_export]
macro_rules! sh {
    // Single command with explicit options
    (options($opts:expr), $cmd:expr $(,)?) => {{ $crate::sh::sh($cmd, $opts) }};

    // Single command with default options
    ($cmd:expr $(,)?) => {{ $crate::sh::sh($cmd, $crate::sh::ShOptions::default()) }};
}

pub fn sh<S, O>(cmd: S, opts: O) -> Result<ShOutput>
where
    S: AsRef<str>,
    O: ShConfig,
{
    let cmd = cmd.as_ref();
    log::debug!("[sh] {}", cmd);
    if !opts.quiet() {
        eprintln!("$ {}", cmd.trim());
    }

    let mut command = Command::new("sh");
    command.arg("-c").arg(cmd);
    opts.apply(&mut command);

    let output = command.output()?;

    if !output.status.success() {
        return Err(format!(
            "Command failed: {}\nExit code: {:?}\n{}",
            cmd,
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr),
        )
        .into());
    }

    Ok(ShOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout_and_env() {
        let opts = ShOptionsBuilder::default()
            .stdout(StreamMode::Pipe)
            .stderr(StreamMode::Pipe)
            .env(vec![("HARMONIC_TERMS".to_string(), "42".to_string())])
            .build()
            .unwrap();
        let out = crate::sh!(options(opts), "echo N=$HARMONIC_TERMS").unwrap();
        assert!(out.status.success());
        assert_eq!(out.stdout.trim(), "N=42");
    }

    #[test]
    fn test_failure_is_error() {
        let opts = ShOptions {
            stdout: StreamMode::Null,
            stderr: StreamMode::Null,
            ..Default::default()
        };
        assert!(crate::sh!(options(opts), "exit 3").is_err());
    }
}
