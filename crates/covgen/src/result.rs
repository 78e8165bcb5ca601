//! Result and error types for covgen.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for covgen operations
pub type CovgenResult<T> = Result<T, CovgenError>;

/// Errors that can occur while producing a coverage report
#[derive(Debug, Error)]
pub enum CovgenError {
    /// A required executable could not be started
    #[error("{tool} not found! {hint}")]
    ToolNotFound {
        /// Executable name
        tool: String,
        /// What the user should install or configure
        hint: String,
    },

    /// An external tool exited unsuccessfully
    #[error("Command `{command}` failed with {}", describe_code(.code))]
    ToolFailed {
        /// Rendered command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// Discovery found nothing to run
    #[error("No test application found under {} (looking for '{fragment}' in file names)", .root.display())]
    NoTestBinaries {
        /// Discovery root
        root: PathBuf,
        /// Name fragment that was searched for
        fragment: String,
    },

    /// A stage expected an intermediate file that the previous stage did not produce
    #[error("Expected {kind} file {} was not produced", .path.display())]
    MissingArtifact {
        /// Artifact kind, e.g. `.profraw`
        kind: String,
        /// Missing path
        path: PathBuf,
    },

    /// Inconsistent toolchain or option selection
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// A path given on the command line is unusable
    #[error("Path {} is not available: {reason}", .path.display())]
    PathUnavailable {
        /// Offending path
        path: PathBuf,
        /// Why it is unusable
        reason: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl CovgenError {
    /// Create a tool-not-found error
    #[must_use]
    pub fn tool_not_found(tool: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::ToolNotFound {
            tool: tool.into(),
            hint: hint.into(),
        }
    }

    /// Create an invalid configuration error
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a missing artifact error
    #[must_use]
    pub fn missing_artifact(kind: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingArtifact {
            kind: kind.into(),
            path: path.into(),
        }
    }

    /// Create a path-unavailable error
    #[must_use]
    pub fn path_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::PathUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[allow(clippy::ref_option)]
fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(
        || "no exit code (terminated by signal)".to_string(),
        |c| format!("exit code {c}"),
    )
}
