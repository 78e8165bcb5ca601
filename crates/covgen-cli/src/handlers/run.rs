//! Run command handler

use crate::commands::RunArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::ProgressReporter;
use covgen::{
    detect_environment, Pipeline, PipelineConfig, ProcessRunner, RunReport, SystemRunner,
    Toolchain,
};
use tracing::debug;

/// Translate command line arguments into a pipeline configuration
#[must_use]
pub fn pipeline_config(args: &RunArgs) -> PipelineConfig {
    PipelineConfig::new()
        .with_root(&args.project.root_dir)
        .with_fragment(&args.project.pattern)
        .with_report_dir(&args.report_dir)
        .with_report_name(&args.report_name)
        .with_toolchain(Toolchain::new(
            args.toolchain.compiler.into(),
            args.toolchain.report_tool.into(),
        ))
        .with_shell(args.toolchain.shell.into())
        .with_excludes(args.excludes.clone())
        .with_summary(&args.summary)
}

/// Resolve, probe tools and run the whole pipeline
pub fn run_with(
    runner: &dyn ProcessRunner,
    host_is_windows: bool,
    reporter: &ProgressReporter,
    args: &RunArgs,
) -> CliResult<RunReport> {
    let config = pipeline_config(args).resolve()?;
    debug!(?config, "resolved configuration");

    reporter.header("Detect tools");
    let env = detect_environment(runner, &config.toolchain, config.shell, host_is_windows)?;
    for tool in &env.tools {
        let version = tool.version.as_deref().unwrap_or("");
        reporter.success(&format!("{} {version}", tool.name));
    }
    if env.layer.is_wsl() {
        reporter.info("lcov tools run through WSL");
    }

    let report = Pipeline::new(config, runner, env.layer)
        .with_observer(reporter)
        .run()?;
    Ok(report)
}

/// Run the pipeline and report the outcome on `reporter`
pub fn run_reported(
    runner: &dyn ProcessRunner,
    host_is_windows: bool,
    reporter: &ProgressReporter,
    args: &RunArgs,
) -> CliResult<()> {
    match run_with(runner, host_is_windows, reporter, args) {
        Ok(report) => {
            reporter.summary(&report);
            Ok(())
        }
        Err(e) => {
            reporter.finish();
            reporter.failure("Coverage report not generated");
            Err(e)
        }
    }
}

/// Execute the run command
pub fn execute_run(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    run_reported(&SystemRunner, cfg!(windows), &reporter, args)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use crate::error::CliError;
    use crate::handlers::fakes::{EmptyMachine, Equipped};
    use clap::Parser;
    use covgen::{Compiler, CovgenError, ReportTool, ShellMode};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["covgen", "run"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Run(args) => args,
            other => panic!("expected Run command, got {other:?}"),
        }
    }

    #[test]
    fn test_pipeline_config_maps_every_flag() {
        let args = run_args(&[
            "-i",
            "build",
            "-o",
            "out",
            "-n",
            "all.info",
            "--pattern",
            "check",
            "--compiler",
            "gcc",
            "--shell",
            "native",
            "-e",
            "/usr/*",
            "--summary",
            "COVERAGE.md",
        ]);
        let config = pipeline_config(&args);

        assert_eq!(config.root, PathBuf::from("build"));
        assert_eq!(config.report_dir, PathBuf::from("out"));
        assert_eq!(config.report_name, "all.info");
        assert_eq!(config.fragment, "check");
        assert_eq!(config.toolchain.compiler, Compiler::Gcc);
        assert_eq!(config.toolchain.report_tool, ReportTool::Genhtml);
        assert_eq!(config.shell, ShellMode::Native);
        assert_eq!(config.excludes, vec!["/usr/*".to_string()]);
        assert_eq!(config.summary, PathBuf::from("COVERAGE.md"));
    }

    #[test]
    fn test_missing_root_fails_before_detection() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let args = run_args(&["-i", missing.to_str().unwrap()]);
        let reporter = ProgressReporter::new(false, true);

        let err = run_with(&Equipped, false, &reporter, &args).unwrap_err();
        assert!(matches!(
            err,
            CliError::Covgen(CovgenError::PathUnavailable { .. })
        ));
    }

    #[test]
    fn test_gcc_with_llvm_cov_rejected() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_str().unwrap();
        let out = temp.path().join("out");
        let args = run_args(&[
            "-i",
            root,
            "-o",
            out.to_str().unwrap(),
            "--compiler",
            "gcc",
            "--report-tool",
            "llvm-cov",
        ]);
        let reporter = ProgressReporter::new(false, true);

        let err = run_with(&Equipped, false, &reporter, &args).unwrap_err();
        assert!(matches!(
            err,
            CliError::Covgen(CovgenError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_missing_tool_reported() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let args = run_args(&["-i", temp.path().to_str().unwrap(), "-o", out.to_str().unwrap()]);
        let reporter = ProgressReporter::new(false, true);

        let err = run_with(&EmptyMachine, false, &reporter, &args).unwrap_err();
        match err {
            CliError::Covgen(CovgenError::ToolNotFound { tool, .. }) => {
                assert_eq!(tool, "llvm-profdata");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_tree_has_no_binaries() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let args = run_args(&["-i", temp.path().to_str().unwrap(), "-o", out.to_str().unwrap()]);
        let reporter = ProgressReporter::new(false, true);

        let err = run_with(&Equipped, false, &reporter, &args).unwrap_err();
        assert!(matches!(
            err,
            CliError::Covgen(CovgenError::NoTestBinaries { .. })
        ));
    }

    #[test]
    fn test_failed_run_drops_progress_bar() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let args = run_args(&["-i", temp.path().to_str().unwrap(), "-o", out.to_str().unwrap()]);
        let reporter = ProgressReporter::new(false, false);
        reporter.start_progress(2, "tests");

        let err = run_reported(&Equipped, false, &reporter, &args).unwrap_err();

        assert!(matches!(
            err,
            CliError::Covgen(CovgenError::NoTestBinaries { .. })
        ));
        assert!(reporter.progress_bar.borrow().is_none());
    }
}
