//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Coverage pipeline error
    #[error(transparent)]
    Covgen(#[from] covgen::CovgenError),

    /// JSON rendering error
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// `detect` found tools missing
    #[error("Missing coverage tools: {}", .tools.join(", "))]
    MissingTools {
        /// Names of the tools that did not answer
        tools: Vec<String>,
    },
}
