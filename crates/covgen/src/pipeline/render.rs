//! HTML rendering stage

use super::tracefile::LCOV_COVERAGE_FLAGS;
use super::{Pipeline, Stage};
use crate::artifacts::sibling;
use crate::process::{native_arg, run_checked, Invocation};
use crate::result::CovgenResult;
use crate::toolchain::ReportTool;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Profile merged across all binaries for `llvm-cov show`, deleted once the
/// report is rendered
pub const MERGED_PROFILE: &str = "merged.profdata";

impl Pipeline<'_> {
    pub(crate) fn genhtml_invocation(&self) -> Invocation {
        self.layer
            .command("genhtml")
            .args(LCOV_COVERAGE_FLAGS)
            .arg(self.layer.host_arg(&self.config.tracefile()))
            .arg(format!(
                "--output-directory={}",
                self.layer.host_arg(&self.config.report_dir)
            ))
    }

    pub(crate) fn merge_all_invocation(&self, binaries: &[PathBuf]) -> Invocation {
        Invocation::new("llvm-profdata")
            .args(["merge", "-sparse"])
            .args(binaries.iter().map(|b| native_arg(&sibling(b, "profdata"))))
            .arg("-o")
            .arg(native_arg(&self.config.report_dir.join(MERGED_PROFILE)))
    }

    pub(crate) fn show_invocation(&self, binaries: &[PathBuf]) -> Invocation {
        let mut invocation = Invocation::new("llvm-cov")
            .args(["show", "-format=html"])
            .arg(format!("-output-dir={}", native_arg(&self.config.report_dir)))
            .arg(format!(
                "-instr-profile={}",
                native_arg(&self.config.report_dir.join(MERGED_PROFILE))
            ));

        for (i, binary) in binaries.iter().enumerate() {
            if i > 0 {
                invocation = invocation.arg("-object");
            }
            invocation = invocation.arg(native_arg(binary));
        }
        for pattern in &self.config.excludes {
            invocation = invocation.arg(format!("-ignore-filename-regex={pattern}"));
        }
        invocation
    }

    /// Render the report and return the host path of its entry page
    pub(crate) fn render_html(&self, binaries: &[PathBuf]) -> CovgenResult<PathBuf> {
        self.stage(Stage::Render);

        match self.config.toolchain.report_tool {
            ReportTool::Genhtml => {
                run_checked(self.runner, &self.genhtml_invocation())?;
            }
            ReportTool::LlvmCov => {
                run_checked(self.runner, &self.merge_all_invocation(binaries))?;
                let shown = run_checked(self.runner, &self.show_invocation(binaries));

                let merged = self.config.report_dir.join(MERGED_PROFILE);
                if merged.exists() {
                    fs::remove_file(&merged)?;
                    debug!(path = %merged.display(), "removed merged profile");
                }
                shown?;
            }
        }

        Ok(self.config.index())
    }
}
