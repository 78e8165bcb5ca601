//! Compiler families, report renderers and the shell layer they run in

use crate::paths::to_wsl_path;
use crate::process::{posix_arg, Invocation};
use crate::result::{CovgenError, CovgenResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Executable that wraps commands for the WSL layer
pub const WSL: &str = "wsl";

/// Compiler family the test binaries were instrumented with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compiler {
    /// LLVM source-based coverage (`-fprofile-instr-generate -fcoverage-mapping`)
    #[default]
    Clang,
    /// gcov coverage (`--coverage`), `.gcda` files land next to the objects
    Gcc,
}

impl Compiler {
    /// Extensions of intermediate files left over from a previous run
    #[must_use]
    pub const fn artifact_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Clang => &["profraw", "profdata", "lcov"],
            Self::Gcc => &["gcda", "lcov"],
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clang => write!(f, "clang"),
            Self::Gcc => write!(f, "gcc"),
        }
    }
}

/// Tool that renders the HTML report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportTool {
    /// `genhtml` from the lcov package, fed the aggregate tracefile
    #[default]
    Genhtml,
    /// `llvm-cov show -format=html`, fed a merged profile (Clang only)
    LlvmCov,
}

impl fmt::Display for ReportTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genhtml => write!(f, "genhtml"),
            Self::LlvmCov => write!(f, "llvm-cov"),
        }
    }
}

/// Requested compatibility-shell behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShellMode {
    /// Use WSL for Linux-only tools when the host is Windows
    #[default]
    Auto,
    /// Run every tool directly on the host
    Native,
    /// Always run Linux-only tools through WSL
    Wsl,
}

/// Where shell-placed tools actually run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShellLayer {
    /// Directly on the host
    Native,
    /// Inside WSL, reached through `wsl <tool> ...`
    Wsl,
}

impl ShellLayer {
    /// Resolve the requested mode against the host platform
    #[must_use]
    pub const fn resolve(mode: ShellMode, host_is_windows: bool) -> Self {
        match mode {
            ShellMode::Native => Self::Native,
            ShellMode::Wsl => Self::Wsl,
            ShellMode::Auto if host_is_windows => Self::Wsl,
            ShellMode::Auto => Self::Native,
        }
    }

    /// Whether commands are wrapped with `wsl`
    #[must_use]
    pub const fn is_wsl(self) -> bool {
        matches!(self, Self::Wsl)
    }

    /// Spell `path` the way a tool inside this layer expects it
    #[must_use]
    pub fn host_arg(self, path: &Path) -> String {
        let arg = posix_arg(path);
        match self {
            Self::Native => arg,
            Self::Wsl => to_wsl_path(&arg),
        }
    }

    /// Build an invocation of a Linux-side tool in this layer
    #[must_use]
    pub fn command(self, program: &str) -> Invocation {
        match self {
            Self::Native => Invocation::new(program),
            Self::Wsl => Invocation::new(WSL).arg(program),
        }
    }
}

impl fmt::Display for ShellLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Wsl => write!(f, "wsl"),
        }
    }
}

/// Where a required tool is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// On the host, always
    Host,
    /// In the shell layer (WSL when active)
    Shell,
}

/// A required external executable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tool {
    /// Executable name
    pub name: &'static str,
    /// Where it runs
    pub placement: Placement,
    /// Advice printed when the tool is missing
    pub hint: &'static str,
}

impl Tool {
    const fn host(name: &'static str, hint: &'static str) -> Self {
        Self {
            name,
            placement: Placement::Host,
            hint,
        }
    }

    const fn shell(name: &'static str, hint: &'static str) -> Self {
        Self {
            name,
            placement: Placement::Shell,
            hint,
        }
    }
}

const CLANG_HINT: &str = "Make sure clang tools are added to system path.";
const LCOV_HINT: &str = "Make sure lcov package is installed.";
const GCOV_HINT: &str = "Make sure gcc is installed where lcov runs.";

/// Compiler and renderer selection for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Toolchain {
    /// Instrumenting compiler family
    pub compiler: Compiler,
    /// HTML renderer
    pub report_tool: ReportTool,
}

impl Toolchain {
    /// Create a toolchain selection
    #[must_use]
    pub const fn new(compiler: Compiler, report_tool: ReportTool) -> Self {
        Self {
            compiler,
            report_tool,
        }
    }

    /// Reject combinations no tool can serve
    pub fn validate(&self) -> CovgenResult<()> {
        if self.compiler == Compiler::Gcc && self.report_tool == ReportTool::LlvmCov {
            return Err(CovgenError::invalid_config(
                "llvm-cov can only render reports for clang-instrumented binaries; use genhtml with gcc",
            ));
        }
        Ok(())
    }

    /// Whether an lcov aggregate tracefile is produced
    #[must_use]
    pub fn builds_tracefile(&self) -> bool {
        self.compiler == Compiler::Gcc || self.report_tool == ReportTool::Genhtml
    }

    /// Every executable the run needs, host tools first
    #[must_use]
    pub fn required_tools(&self) -> Vec<Tool> {
        let mut tools = Vec::new();

        match self.compiler {
            Compiler::Clang => {
                tools.push(Tool::host("llvm-profdata", CLANG_HINT));
                tools.push(Tool::host("llvm-cov", CLANG_HINT));
            }
            Compiler::Gcc => tools.push(Tool::shell("gcov", GCOV_HINT)),
        }

        if self.builds_tracefile() {
            tools.push(Tool::shell("lcov", LCOV_HINT));
        }
        if self.report_tool == ReportTool::Genhtml {
            tools.push(Tool::shell("genhtml", LCOV_HINT));
        }

        tools
    }

    /// Whether any required tool lives in the shell layer
    #[must_use]
    pub fn needs_shell_layer(&self) -> bool {
        self.required_tools()
            .iter()
            .any(|t| t.placement == Placement::Shell)
    }
}
