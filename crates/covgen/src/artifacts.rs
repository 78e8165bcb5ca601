//! Intermediate artifact naming and cleanup

use crate::discovery::has_extension;
use crate::result::CovgenResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Intermediate file belonging to one test binary, e.g. `<bin>.profraw`.
///
/// The binary's own extension (`.exe`) is replaced, so the file sits next to
/// the binary under the same stem.
#[must_use]
pub fn sibling(binary: &Path, extension: &str) -> PathBuf {
    binary.with_extension(extension)
}

/// File name only of [`sibling`], used where the tool runs inside the
/// binary's directory
#[must_use]
pub fn sibling_name(binary: &Path, extension: &str) -> String {
    sibling(binary, extension)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Delete every file below `root` carrying one of `extensions`.
///
/// Symlinks are removed themselves, never their targets. Directory symlinks
/// are neither descended into nor removed. Returns the removed paths.
pub fn clean_artifacts(root: &Path, extensions: &[&str]) -> CovgenResult<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        if extensions.iter().any(|ext| has_extension(path, ext)) {
            fs::remove_file(path)?;
            debug!(path = %path.display(), "removed stale artifact");
            removed.push(path.to_path_buf());
        }
    }

    info!(count = removed.len(), "cleaned artifacts");
    removed.sort();
    Ok(removed)
}
