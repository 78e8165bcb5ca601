//! covgen CLI Library
//!
//! Command-line front end for the covgen coverage pipeline.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    CleanArgs, Cli, ColorArg, Commands, CompilerArg, DetectArgs, DiscoverArgs, OutputFormatArg,
    ProjectArgs, ReportToolArg, RunArgs, ShellArg, ToolchainArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::init_logging;
pub use output::ProgressReporter;
