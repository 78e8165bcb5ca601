//! External process invocation
//!
//! Every tool covgen drives goes through [`ProcessRunner`], so the pipeline can
//! be exercised in tests without LLVM or lcov installed.

use crate::result::{CovgenError, CovgenResult};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Where a child's standard output goes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Capture {
    /// Share the parent's stdout
    #[default]
    Inherit,
    /// Collect stdout into [`Completed::stdout`]
    Piped,
    /// Redirect stdout into a file (created or truncated)
    File(PathBuf),
}

/// A fully described external command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    /// Executable name or path
    pub program: String,
    /// Arguments, already translated for the target environment
    pub args: Vec<String>,
    /// Working directory
    pub cwd: Option<PathBuf>,
    /// Extra environment variables on top of the inherited environment
    pub env: Vec<(String, String)>,
    /// Stdout handling
    pub capture: Capture,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add an environment variable
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Collect stdout in memory
    #[must_use]
    pub fn piped(mut self) -> Self {
        self.capture = Capture::Piped;
        self
    }

    /// Redirect stdout into `path`
    #[must_use]
    pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.capture = Capture::File(path.into());
        self
    }

    /// Program followed by its arguments, space separated
    #[must_use]
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Outcome of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Completed {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    /// Captured stdout (empty unless [`Capture::Piped`])
    pub stdout: String,
}

impl Completed {
    /// Successful completion with no output
    #[must_use]
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            stdout: String::new(),
        }
    }

    /// Completion with the given exit code
    #[must_use]
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
        }
    }

    /// Attach captured stdout
    #[must_use]
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    /// Whether the process exited with status zero
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Runs external processes to completion
pub trait ProcessRunner {
    /// Run `invocation` and wait for it.
    ///
    /// Returns `Err` only if the process could not be started; a non-zero
    /// exit is reported through [`Completed::code`].
    fn run(&self, invocation: &Invocation) -> io::Result<Completed>;
}

/// [`ProcessRunner`] backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<Completed> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(ref dir) = invocation.cwd {
            command.current_dir(dir);
        }
        for (key, value) in &invocation.env {
            command.env(key, value);
        }

        match invocation.capture {
            Capture::Inherit => {
                let status = command.status()?;
                Ok(Completed {
                    code: status.code(),
                    stdout: String::new(),
                })
            }
            Capture::Piped => {
                let output = command.stderr(Stdio::piped()).stdout(Stdio::piped()).output()?;
                Ok(Completed {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                })
            }
            Capture::File(ref path) => {
                let file = File::create(path)?;
                let status = command.stdout(Stdio::from(file)).status()?;
                Ok(Completed {
                    code: status.code(),
                    stdout: String::new(),
                })
            }
        }
    }
}

/// Run `invocation` and require a zero exit status.
///
/// A program that cannot be found becomes [`CovgenError::ToolNotFound`]; any
/// other non-zero outcome becomes [`CovgenError::ToolFailed`].
pub fn run_checked(runner: &dyn ProcessRunner, invocation: &Invocation) -> CovgenResult<Completed> {
    debug!(command = %invocation.display(), cwd = ?invocation.cwd, "spawning");

    let completed = runner.run(invocation).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            CovgenError::tool_not_found(
                invocation.program.clone(),
                "Make sure it is installed and on the system path.",
            )
        } else {
            CovgenError::Io(e)
        }
    })?;

    if completed.success() {
        Ok(completed)
    } else {
        Err(CovgenError::ToolFailed {
            command: invocation.display(),
            code: completed.code,
        })
    }
}

/// Render a path argument with forward slashes
#[must_use]
pub fn posix_arg(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Render a path argument exactly as the host spells it
#[must_use]
pub fn native_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
