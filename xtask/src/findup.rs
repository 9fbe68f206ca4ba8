use std::path::{Path, PathBuf};

use crate::Result;

/// Nearest ancestor of `start` (inclusive) that contains `marker`.
fn ancestor_with(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).exists())
        .map(Path::to_path_buf)
}

/// The harmonic workspace root: the directory holding `matrix.yaml`.
///
/// Searches upwards from the current directory, then from this crate's
/// manifest directory.
pub fn workspace_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    ancestor_with(&cwd, "matrix.yaml")
        .or_else(|| ancestor_with(Path::new(env!("CARGO_MANIFEST_DIR")), "matrix.yaml"))
        .ok_or_else(|| "matrix.yaml not found (run from within the repo or pass --config)".into())
}
