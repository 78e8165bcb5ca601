//! Aggregate tracefile stage (lcov)

use super::{Pipeline, Stage};
use crate::artifacts::sibling;
use crate::paths::rewrite_tracefile;
use crate::process::{run_checked, Invocation};
use crate::result::{CovgenError, CovgenResult};
use crate::toolchain::Compiler;
use std::path::{Path, PathBuf};
use tracing::info;

/// Coverage kinds requested from lcov and genhtml
pub const LCOV_COVERAGE_FLAGS: [&str; 2] = ["--function-coverage", "--branch-coverage"];

impl Pipeline<'_> {
    fn lcov(&self) -> Invocation {
        self.layer.command("lcov").args(LCOV_COVERAGE_FLAGS)
    }

    /// `lcov -a` over the per-binary exports (clang)
    pub(crate) fn combine_invocation(&self, binaries: &[PathBuf], output: &Path) -> Invocation {
        let mut invocation = self.lcov();
        for binary in binaries {
            invocation = invocation
                .arg("-a")
                .arg(self.layer.host_arg(&sibling(binary, "lcov")));
        }
        invocation.arg("-o").arg(self.layer.host_arg(output))
    }

    /// `lcov --capture` over the `.gcda` files below the root (gcc)
    pub(crate) fn capture_invocation(&self, output: &Path) -> Invocation {
        self.lcov()
            .args(["--capture", "--directory"])
            .arg(self.layer.host_arg(&self.config.root))
            .arg("-o")
            .arg(self.layer.host_arg(output))
    }

    /// `lcov --remove` dropping excluded sources in place
    pub(crate) fn remove_invocation(&self, tracefile: &Path) -> Invocation {
        let path = self.layer.host_arg(tracefile);
        self.lcov()
            .arg("--remove")
            .arg(path.clone())
            .args(self.config.excludes.iter().cloned())
            .arg("-o")
            .arg(path)
    }

    /// Build the aggregate tracefile and return its host path
    pub(crate) fn build_tracefile(&self, binaries: &[PathBuf]) -> CovgenResult<PathBuf> {
        self.stage(Stage::Tracefile);
        let tracefile = self.config.tracefile();

        let invocation = match self.config.toolchain.compiler {
            Compiler::Clang => {
                for binary in binaries {
                    let lcov = sibling(binary, "lcov");
                    if !lcov.is_file() {
                        return Err(CovgenError::missing_artifact(".lcov", lcov));
                    }
                }
                self.combine_invocation(binaries, &tracefile)
            }
            Compiler::Gcc => self.capture_invocation(&tracefile),
        };
        run_checked(self.runner, &invocation)?;

        // lcov inside WSL records SF: paths the way the host wrote them
        if self.layer.is_wsl() {
            rewrite_tracefile(&tracefile)?;
        }

        if !self.config.excludes.is_empty() {
            info!(patterns = ?self.config.excludes, "removing excluded sources");
            run_checked(self.runner, &self.remove_invocation(&tracefile))?;
        }

        Ok(tracefile)
    }
}
