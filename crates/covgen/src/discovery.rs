//! Test binary discovery
//!
//! A file is a test binary when its stem contains the configured fragment
//! (case-insensitive) and it is executable on the host: the execute bit on
//! Unix, an `.exe` extension on Windows.

use crate::result::{CovgenError, CovgenResult};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Default fragment test binaries are recognised by
pub const DEFAULT_TEST_FRAGMENT: &str = "test";

/// Case-insensitive check that the file stem contains `fragment`
#[must_use]
pub fn stem_matches(path: &Path, fragment: &str) -> bool {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .is_some_and(|stem| stem.contains(&fragment.to_lowercase()))
}

/// Whether `path` has the given extension (case-insensitive)
#[must_use]
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
}

/// Whether `path` is a file the host can execute
#[cfg(unix)]
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Whether `path` is a file the host can execute
#[cfg(windows)]
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    path.is_file() && has_extension(path, "exe")
}

/// Every file below `root` whose stem contains `fragment`, optionally
/// restricted to one extension. Sorted for stable output.
///
/// Symlinks to files are returned as found. Directory symlinks are not
/// descended into.
pub fn find_files(root: &Path, fragment: &str, extension: Option<&str>) -> CovgenResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let path = entry.path();
        if extension.is_some_and(|ext| !has_extension(path, ext)) {
            continue;
        }
        if stem_matches(path, fragment) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Find the test executables below `root`.
///
/// An empty result is an error: there is nothing to measure.
pub fn find_test_binaries(root: &Path, fragment: &str) -> CovgenResult<Vec<PathBuf>> {
    let extension = if cfg!(windows) { Some("exe") } else { None };
    let binaries: Vec<PathBuf> = find_files(root, fragment, extension)?
        .into_iter()
        .filter(|p| is_executable(p))
        .collect();

    debug!(count = binaries.len(), root = %root.display(), "discovered test binaries");

    if binaries.is_empty() {
        return Err(CovgenError::NoTestBinaries {
            root: root.to_path_buf(),
            fragment: fragment.to_string(),
        });
    }
    Ok(binaries)
}
