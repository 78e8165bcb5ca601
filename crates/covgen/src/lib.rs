//! covgen: HTML coverage reports from instrumented test binaries
//!
//! covgen does no coverage math of its own. It finds test executables by
//! name, runs them, and drives the external LLVM / gcov / lcov tools that
//! merge and render their instrumentation data.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌───────────────────────────────┐
//! │ detect       │──►│ discovery   │──►│ pipeline                      │
//! │ tool probes  │   │ test_* bins │   │ run ► merge ► lcov ► genhtml  │
//! └──────────────┘   └─────────────┘   └──────────────┬────────────────┘
//!                                                     │ ProcessRunner
//!                                                     ▼
//!                                      llvm-profdata, llvm-cov, lcov, genhtml
//!                                      (optionally through `wsl`)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use covgen::{detect_environment, Pipeline, PipelineConfig, SystemRunner};
//!
//! # fn main() -> covgen::CovgenResult<()> {
//! let config = PipelineConfig::new().with_root("build").resolve()?;
//! let runner = SystemRunner;
//! let env = detect_environment(&runner, &config.toolchain, config.shell, cfg!(windows))?;
//! let report = Pipeline::new(config, &runner, env.layer).run()?;
//! println!("report at {}", report.index.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod artifacts;
pub mod detect;
pub mod discovery;
pub mod paths;
pub mod pipeline;
pub mod process;
mod result;
pub mod summary;
pub mod toolchain;

pub use artifacts::clean_artifacts;
pub use detect::{detect_environment, survey_environment, Environment, ToolStatus};
pub use discovery::{find_files, find_test_binaries, DEFAULT_TEST_FRAGMENT};
pub use paths::{rewrite_source_lines, rewrite_tracefile, to_wsl_path};
pub use pipeline::{
    Pipeline, PipelineConfig, PipelineObserver, RunReport, Silent, Stage, DEFAULT_REPORT_DIR,
    DEFAULT_REPORT_NAME,
};
pub use process::{Capture, Completed, Invocation, ProcessRunner, SystemRunner};
pub use result::{CovgenError, CovgenResult};
pub use summary::{write_summary, DEFAULT_SUMMARY_PATH};
pub use toolchain::{Compiler, Placement, ReportTool, ShellLayer, ShellMode, Tool, Toolchain};
