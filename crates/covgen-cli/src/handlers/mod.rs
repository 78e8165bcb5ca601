//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure helper functions
//! - Tests

pub mod clean;
pub mod detect;
pub mod discover;
pub mod run;

pub use clean::execute_clean;
pub use detect::{execute_detect, render_environment};
pub use discover::{execute_discover, render_discovery};
pub use run::{execute_run, pipeline_config, run_reported, run_with};
