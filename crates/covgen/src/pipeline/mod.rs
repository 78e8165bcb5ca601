//! Coverage pipeline
//!
//! ```text
//! discover ─► clean ─► run tests ─► [clang] merge .profraw ─► export .lcov
//!                                   │
//!                                   └─► aggregate tracefile ─► render HTML ─► COVERAGE.md
//! ```
//!
//! Stages run strictly in order; the first failing tool aborts the run.

mod clang;
mod execute;
mod render;
mod tracefile;

use crate::artifacts::clean_artifacts;
use crate::discovery::{find_test_binaries, DEFAULT_TEST_FRAGMENT};
use crate::process::ProcessRunner;
use crate::result::{CovgenError, CovgenResult};
use crate::summary::{write_summary, DEFAULT_SUMMARY_PATH};
use crate::toolchain::{Compiler, ShellLayer, ShellMode, Toolchain};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Default report directory, relative to the working directory
pub const DEFAULT_REPORT_DIR: &str = "docs/coverage";

/// Default aggregate tracefile name
pub const DEFAULT_REPORT_NAME: &str = "coverage.info";

/// Everything a run needs to know
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Root of test discovery and artifact cleanup
    pub root: PathBuf,
    /// Directory receiving the tracefile and the HTML report
    pub report_dir: PathBuf,
    /// File name of the aggregate tracefile inside `report_dir`
    pub report_name: String,
    /// Fragment test binaries carry in their names
    pub fragment: String,
    /// Compiler and renderer
    pub toolchain: Toolchain,
    /// Source patterns dropped from the report
    pub excludes: Vec<String>,
    /// Markdown summary location
    pub summary: PathBuf,
    /// Compatibility shell selection
    pub shell: ShellMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            report_name: DEFAULT_REPORT_NAME.to_string(),
            fragment: DEFAULT_TEST_FRAGMENT.to_string(),
            toolchain: Toolchain::default(),
            excludes: Vec::new(),
            summary: PathBuf::from(DEFAULT_SUMMARY_PATH),
            shell: ShellMode::Auto,
        }
    }
}

impl PipelineConfig {
    /// Create default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set discovery root
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set report directory
    #[must_use]
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    /// Set tracefile name
    #[must_use]
    pub fn with_report_name(mut self, name: impl Into<String>) -> Self {
        self.report_name = name.into();
        self
    }

    /// Set test name fragment
    #[must_use]
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = fragment.into();
        self
    }

    /// Set toolchain
    #[must_use]
    pub const fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// Set exclusion patterns
    #[must_use]
    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    /// Set summary path
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<PathBuf>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set shell mode
    #[must_use]
    pub const fn with_shell(mut self, shell: ShellMode) -> Self {
        self.shell = shell;
        self
    }

    /// Make paths absolute, require the root to exist and create the
    /// report directory.
    ///
    /// The summary path, when relative, is taken relative to the root.
    pub fn resolve(mut self) -> CovgenResult<Self> {
        let cwd = std::env::current_dir()?;
        self.root = absolute(&cwd, &self.root);
        self.report_dir = absolute(&cwd, &self.report_dir);
        self.summary = absolute(&self.root, &self.summary);

        if !self.root.is_dir() {
            return Err(CovgenError::path_unavailable(
                &self.root,
                "directory does not exist",
            ));
        }
        if self.report_name.is_empty() {
            return Err(CovgenError::invalid_config("report name must not be empty"));
        }
        if self.fragment.is_empty() {
            return Err(CovgenError::invalid_config("test name fragment must not be empty"));
        }
        std::fs::create_dir_all(&self.report_dir).map_err(|e| {
            CovgenError::path_unavailable(
                &self.report_dir,
                format!("does not exist and could not be created: {e}"),
            )
        })?;
        self.toolchain.validate()?;
        Ok(self)
    }

    /// Aggregate tracefile path
    #[must_use]
    pub fn tracefile(&self) -> PathBuf {
        self.report_dir.join(&self.report_name)
    }

    /// Entry page of the rendered report
    #[must_use]
    pub fn index(&self) -> PathBuf {
        self.report_dir.join("index.html")
    }
}

/// Join `path` onto `base` unless it is already absolute.
///
/// No `canonicalize`: verbatim `\\?\C:\` paths break drive-letter translation.
fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else if path == Path::new(".") {
        base.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Pipeline stage, for progress reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    /// Looking for test binaries
    Discover,
    /// Deleting stale artifacts
    Clean,
    /// Running the instrumented binaries
    RunTests,
    /// `.profraw` → `.profdata`
    MergeProfiles,
    /// `.profdata` → `.lcov`
    ExportLcov,
    /// Building the aggregate tracefile
    Tracefile,
    /// Rendering HTML
    Render,
    /// Writing COVERAGE.md
    Summary,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Discover => "Discover test applications",
            Self::Clean => "Clean previous artifacts",
            Self::RunTests => "Run test applications",
            Self::MergeProfiles => "Merge .profraw into .profdata",
            Self::ExportLcov => "Export .profdata to .lcov",
            Self::Tracefile => "Merge coverage into tracefile",
            Self::Render => "Generate HTML report",
            Self::Summary => "Write coverage summary",
        };
        f.write_str(text)
    }
}

/// Receives progress notifications; every method defaults to doing nothing
pub trait PipelineObserver {
    /// A stage is starting
    fn stage(&self, _stage: Stage) {}

    /// Test binary `index` of `total` is about to run
    fn test_started(&self, _index: usize, _total: usize, _binary: &Path) {}

    /// All test binaries finished
    fn tests_finished(&self) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl PipelineObserver for Silent {}

/// What a finished run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Test binaries that were run
    pub binaries: Vec<PathBuf>,
    /// Stale files removed before the run
    pub cleaned: usize,
    /// Aggregate tracefile, when the toolchain builds one
    pub tracefile: Option<PathBuf>,
    /// Entry page of the HTML report
    pub index: PathBuf,
    /// Markdown summary file
    pub summary: PathBuf,
    /// Link written into the summary
    pub link: String,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

/// One configured coverage run
pub struct Pipeline<'a> {
    config: PipelineConfig,
    runner: &'a dyn ProcessRunner,
    layer: ShellLayer,
    observer: &'a dyn PipelineObserver,
}

impl fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("layer", &self.layer)
            .finish_non_exhaustive()
    }
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over a resolved configuration.
    ///
    /// `layer` comes from tool detection.
    #[must_use]
    pub fn new(config: PipelineConfig, runner: &'a dyn ProcessRunner, layer: ShellLayer) -> Self {
        Self {
            config,
            runner,
            layer,
            observer: &Silent,
        }
    }

    /// Attach a progress observer
    #[must_use]
    pub fn with_observer(mut self, observer: &'a dyn PipelineObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn stage(&self, stage: Stage) {
        info!("{stage}");
        self.observer.stage(stage);
    }

    /// Run every stage in order
    pub fn run(&self) -> CovgenResult<RunReport> {
        let start = Instant::now();
        let toolchain = self.config.toolchain;

        self.stage(Stage::Discover);
        let binaries = find_test_binaries(&self.config.root, &self.config.fragment)?;

        self.stage(Stage::Clean);
        let cleaned = clean_artifacts(
            &self.config.root,
            toolchain.compiler.artifact_extensions(),
        )?;

        self.run_tests(&binaries)?;

        if toolchain.compiler == Compiler::Clang {
            self.merge_profiles(&binaries)?;
            if toolchain.builds_tracefile() {
                self.export_lcov(&binaries)?;
            }
        }

        let tracefile = if toolchain.builds_tracefile() {
            Some(self.build_tracefile(&binaries)?)
        } else {
            None
        };

        let index = self.render_html(&binaries)?;

        self.stage(Stage::Summary);
        let link = write_summary(&self.config.summary, &index)?;

        Ok(RunReport {
            binaries,
            cleaned: cleaned.len(),
            tracefile,
            index,
            summary: self.config.summary.clone(),
            link,
            elapsed: start.elapsed(),
        })
    }
}
