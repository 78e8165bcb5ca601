//! Host-to-WSL path translation
//!
//! The lcov tools only run on Linux. When covgen drives them through WSL from
//! a Windows host, every path handed to them (and every `SF:` record inside the
//! tracefile they write) has to use the `/mnt/<drive>/...` mount convention.

use crate::result::CovgenResult;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Mount root of Windows drives inside WSL
pub const WSL_MOUNT_PREFIX: &str = "/mnt/";

/// Tracefile record holding the source file path
pub const SOURCE_FILE_MARKER: &str = "SF:";

/// Check whether `path` starts with a drive letter, e.g. `C:`
#[must_use]
pub fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Translate a Windows host path into its WSL mount path.
///
/// `C:\work\src\main.cpp` becomes `/mnt/c/work/src/main.cpp`. Paths without a
/// drive prefix (including already translated ones) are returned unchanged.
#[must_use]
pub fn to_wsl_path(path: &str) -> String {
    if !has_drive_prefix(path) {
        return path.to_string();
    }

    let drive = path[..1].to_ascii_lowercase();
    let rest = path[2..].replace('\\', "/");
    format!("{WSL_MOUNT_PREFIX}{drive}{rest}")
}

/// Rewrite every `SF:` line of a tracefile so its path is WSL-relative.
///
/// Other lines, and the line terminators, are kept byte for byte.
#[must_use]
pub fn rewrite_source_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        match line.strip_prefix(SOURCE_FILE_MARKER) {
            Some(rest) => {
                let body = rest.trim_end_matches(['\r', '\n']);
                let ending = &rest[body.len()..];
                out.push_str(SOURCE_FILE_MARKER);
                out.push_str(&to_wsl_path(body));
                out.push_str(ending);
            }
            None => out.push_str(line),
        }
    }

    out
}

/// Apply [`rewrite_source_lines`] to a tracefile in place
pub fn rewrite_tracefile(path: &Path) -> CovgenResult<()> {
    debug!(path = %path.display(), "rewriting SF: records for WSL");
    let data = fs::read_to_string(path)?;
    fs::write(path, rewrite_source_lines(&data))?;
    Ok(())
}
