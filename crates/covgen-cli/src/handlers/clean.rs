//! Clean command handler

use crate::commands::CleanArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::ProgressReporter;
use covgen::{clean_artifacts, Compiler, CovgenError};
use std::path::{Path, PathBuf};

/// Remove the given compiler's artifacts below `root`
pub fn clean(root: &Path, compiler: Compiler) -> CliResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CovgenError::path_unavailable(root, "directory does not exist").into());
    }
    Ok(clean_artifacts(root, compiler.artifact_extensions())?)
}

/// Execute the clean command
pub fn execute_clean(config: &CliConfig, args: &CleanArgs) -> CliResult<()> {
    let reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let removed = clean(&args.root_dir, args.compiler.into())?;

    if config.verbosity.is_verbose() {
        for path in &removed {
            reporter.info(&format!("removed {}", path.display()));
        }
    }
    reporter.success(&format!(
        "Removed {} coverage artifact(s) under {}",
        removed.len(),
        args.root_dir.display()
    ));
    Ok(())
}
