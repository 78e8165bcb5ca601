//! Markdown pointer to the rendered report

use crate::result::CovgenResult;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Default location of the summary, relative to the project root
pub const DEFAULT_SUMMARY_PATH: &str = "docs/COVERAGE.md";

/// Timestamp format written under the link
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Relative path from directory `base` to `target`, both absolute.
///
/// Falls back to `target` itself when the two share no root (different drives).
#[must_use]
pub fn relative_path(target: &Path, base: &Path) -> PathBuf {
    let target: Vec<Component<'_>> = target.components().collect();
    let base: Vec<Component<'_>> = base.components().collect();

    let common = target
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return target.iter().collect();
    }

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for part in &target[common..] {
        rel.push(part);
    }
    rel
}

/// Link text as it appears in Markdown: forward slashes only.
///
/// Doc sites serve `docs/COVERAGE.md` as the page `COVERAGE/`, one level
/// below the summary's directory, so the link always starts with `..`.
#[must_use]
pub fn markdown_link(target: &Path, summary_dir: &Path) -> String {
    Path::new("..")
        .join(relative_path(target, summary_dir))
        .to_string_lossy()
        .replace('\\', "/")
}

/// Summary contents for a report index reachable via `link`
#[must_use]
pub fn render_summary(link: &str, generated: DateTime<Local>) -> String {
    format!(
        "# Code Coverage\n\n[Code coverage report]({link})\n\ngenerated {}\n",
        generated.format(TIMESTAMP_FORMAT)
    )
}

/// Write the summary file pointing at `index`, creating parent directories
pub fn write_summary(summary: &Path, index: &Path) -> CovgenResult<String> {
    let dir = summary.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let link = markdown_link(index, dir);
    fs::write(summary, render_summary(&link, Local::now()))?;
    info!(summary = %summary.display(), link = %link, "wrote coverage summary");
    Ok(link)
}
