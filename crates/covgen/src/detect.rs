//! Required tool detection
//!
//! Each tool is probed with `<tool> --version` before anything touches the
//! filesystem, so a run on a misconfigured machine fails up front.

use crate::process::{Invocation, ProcessRunner};
use crate::result::{CovgenError, CovgenResult};
use crate::toolchain::{Placement, ShellLayer, ShellMode, Tool, Toolchain, WSL};
use serde::Serialize;
use tracing::{debug, info};

/// Probe result for one executable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    /// Executable name
    pub name: String,
    /// Where it was probed
    pub placement: Placement,
    /// Whether it answered
    pub found: bool,
    /// First line of its `--version` output
    pub version: Option<String>,
}

/// Resolved execution environment for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    /// Layer Linux-only tools run in
    pub layer: ShellLayer,
    /// Every tool that was probed, in probe order
    pub tools: Vec<ToolStatus>,
}

impl Environment {
    /// Human readable multi-line report
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = format!("Shell layer: {}\n", self.layer);
        for tool in &self.tools {
            let mark = if tool.found { "found" } else { "missing" };
            let version = tool.version.as_deref().unwrap_or("");
            out.push_str(&format!("  {:<14} {:<8} {version}\n", tool.name, mark));
        }
        out
    }
}

/// Probe a single tool.
///
/// Direct probes count as found when the process starts at all. Probes wrapped
/// in `wsl` must also exit zero, since the wrapper itself always starts.
pub fn probe(runner: &dyn ProcessRunner, layer: ShellLayer, tool: &Tool) -> ToolStatus {
    let wrapped = tool.placement == Placement::Shell && layer.is_wsl();
    let invocation = if wrapped {
        layer.command(tool.name).arg("--version").piped()
    } else {
        Invocation::new(tool.name).arg("--version").piped()
    };

    let (found, version) = match runner.run(&invocation) {
        Ok(done) if !wrapped || done.success() => {
            let version = done
                .stdout
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(str::to_string);
            (true, version)
        }
        Ok(_) | Err(_) => (false, None),
    };

    debug!(tool = tool.name, found, ?version, "probed");

    ToolStatus {
        name: tool.name.to_string(),
        placement: tool.placement,
        found,
        version,
    }
}

fn probe_required(
    runner: &dyn ProcessRunner,
    layer: ShellLayer,
    tool: &Tool,
    statuses: &mut Vec<ToolStatus>,
) -> CovgenResult<()> {
    let status = probe(runner, layer, tool);
    let found = status.found;
    statuses.push(status);
    if found {
        info!("{} found!", tool.name);
        Ok(())
    } else {
        Err(CovgenError::tool_not_found(tool.name, tool.hint))
    }
}

/// Check that every tool the toolchain needs is present.
///
/// Host tools are checked first, then the WSL wrapper (only when a Windows
/// host needs Linux-side tools), then the Linux-side tools themselves.
pub fn detect_environment(
    runner: &dyn ProcessRunner,
    toolchain: &Toolchain,
    mode: ShellMode,
    host_is_windows: bool,
) -> CovgenResult<Environment> {
    toolchain.validate()?;

    let layer = if toolchain.needs_shell_layer() {
        ShellLayer::resolve(mode, host_is_windows)
    } else {
        ShellLayer::Native
    };
    let required = toolchain.required_tools();
    let mut statuses = Vec::new();

    for tool in required.iter().filter(|t| t.placement == Placement::Host) {
        probe_required(runner, layer, tool, &mut statuses)?;
    }

    if layer.is_wsl() {
        let wsl = Tool {
            name: WSL,
            placement: Placement::Host,
            hint: "Generating coverage reports require use of Linux tools. Make sure WSL was set up.",
        };
        probe_required(runner, layer, &wsl, &mut statuses)?;
    }

    for tool in required.iter().filter(|t| t.placement == Placement::Shell) {
        probe_required(runner, layer, tool, &mut statuses)?;
    }

    Ok(Environment {
        layer,
        tools: statuses,
    })
}

/// Probe every tool without stopping at the first missing one
pub fn survey_environment(
    runner: &dyn ProcessRunner,
    toolchain: &Toolchain,
    mode: ShellMode,
    host_is_windows: bool,
) -> Environment {
    let layer = if toolchain.needs_shell_layer() {
        ShellLayer::resolve(mode, host_is_windows)
    } else {
        ShellLayer::Native
    };

    let mut tools: Vec<Tool> = toolchain
        .required_tools()
        .into_iter()
        .filter(|t| t.placement == Placement::Host)
        .collect();
    if layer.is_wsl() {
        tools.push(Tool {
            name: WSL,
            placement: Placement::Host,
            hint: "",
        });
    }
    tools.extend(
        toolchain
            .required_tools()
            .into_iter()
            .filter(|t| t.placement == Placement::Shell),
    );

    Environment {
        layer,
        tools: tools.iter().map(|t| probe(runner, layer, t)).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::process::testing::RecordingRunner;
    use crate::toolchain::{Compiler, ReportTool};

    #[test]
    fn test_detect_native_clang() {
        let runner = RecordingRunner::new().printing("lcov", "lcov: LCOV version 2.0-1\n");
        let env = detect_environment(&runner, &Toolchain::default(), ShellMode::Auto, false)
            .unwrap();

        assert_eq!(env.layer, ShellLayer::Native);
        assert_eq!(
            runner.lines(),
            vec![
                "llvm-profdata --version",
                "llvm-cov --version",
                "lcov --version",
                "genhtml --version",
            ]
        );
        let lcov = env.tools.iter().find(|t| t.name == "lcov").unwrap();
        assert_eq!(lcov.version.as_deref(), Some("lcov: LCOV version 2.0-1"));
    }

    #[test]
    fn test_detect_windows_uses_wsl() {
        let runner = RecordingRunner::new();
        let env = detect_environment(&runner, &Toolchain::default(), ShellMode::Auto, true)
            .unwrap();

        assert_eq!(env.layer, ShellLayer::Wsl);
        assert_eq!(
            runner.lines(),
            vec![
                "llvm-profdata --version",
                "llvm-cov --version",
                "wsl --version",
                "wsl lcov --version",
                "wsl genhtml --version",
            ]
        );
    }

    #[test]
    fn test_detect_llvm_cov_report_skips_wsl() {
        let runner = RecordingRunner::new();
        let tc = Toolchain::new(Compiler::Clang, ReportTool::LlvmCov);
        let env = detect_environment(&runner, &tc, ShellMode::Auto, true).unwrap();

        assert_eq!(env.layer, ShellLayer::Native);
        assert_eq!(runner.lines(), vec!["llvm-profdata --version", "llvm-cov --version"]);
    }

    #[test]
    fn test_missing_host_tool_stops_early() {
        let runner = RecordingRunner::new().without("llvm-profdata");
        let err = detect_environment(&runner, &Toolchain::default(), ShellMode::Auto, false)
            .unwrap_err();

        assert!(err.to_string().contains("llvm-profdata not found"));
        assert!(err.to_string().contains("clang tools"));
        assert_eq!(runner.lines().len(), 1);
    }

    #[test]
    fn test_missing_wsl() {
        let runner = RecordingRunner::new().without("wsl");
        let err = detect_environment(&runner, &Toolchain::default(), ShellMode::Wsl, false)
            .unwrap_err();
        assert!(err.to_string().starts_with("wsl not found!"));
    }

    #[test]
    fn test_missing_tool_inside_wsl() {
        let runner = RecordingRunner::new().without("lcov");
        let err = detect_environment(&runner, &Toolchain::default(), ShellMode::Wsl, false)
            .unwrap_err();
        assert!(err.to_string().contains("lcov package"));
    }

    #[test]
    fn test_native_probe_ignores_exit_code() {
        let runner = RecordingRunner::new().failing("genhtml", 1);
        let status = probe(
            &runner,
            ShellLayer::Native,
            &Toolchain::default().required_tools()[3],
        );
        assert_eq!(status.name, "genhtml");
        assert!(status.found);
    }

    #[test]
    fn test_invalid_toolchain_rejected_before_probing() {
        let runner = RecordingRunner::new();
        let tc = Toolchain::new(Compiler::Gcc, ReportTool::LlvmCov);
        assert!(detect_environment(&runner, &tc, ShellMode::Auto, false).is_err());
        assert!(runner.lines().is_empty());
    }

    #[test]
    fn test_survey_reports_all_tools() {
        let runner = RecordingRunner::new().without("lcov").without("genhtml");
        let env = survey_environment(&runner, &Toolchain::default(), ShellMode::Native, false);

        let found: Vec<(String, bool)> =
            env.tools.iter().map(|t| (t.name.clone(), t.found)).collect();
        assert_eq!(
            found,
            vec![
                ("llvm-profdata".to_string(), true),
                ("llvm-cov".to_string(), true),
                ("lcov".to_string(), false),
                ("genhtml".to_string(), false),
            ]
        );
        let report = env.report();
        assert!(report.contains("Shell layer: native"));
        assert!(report.contains("missing"));
    }
}
