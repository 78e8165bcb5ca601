//! Test execution stage

use super::{Pipeline, Stage};
use crate::artifacts::sibling_name;
use crate::process::{native_arg, run_checked, Invocation};
use crate::result::CovgenResult;
use crate::toolchain::Compiler;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming the LLVM raw profile a process writes
pub const LLVM_PROFILE_FILE: &str = "LLVM_PROFILE_FILE";

impl Pipeline<'_> {
    /// Invocation running one test binary from its own directory
    pub(crate) fn test_invocation(&self, binary: &Path) -> Invocation {
        let dir = binary
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let invocation = Invocation::new(native_arg(binary)).current_dir(dir);

        match self.config.toolchain.compiler {
            Compiler::Clang => invocation.env(LLVM_PROFILE_FILE, sibling_name(binary, "profraw")),
            // gcov runtime writes .gcda files next to the objects on its own
            Compiler::Gcc => invocation,
        }
    }

    /// Run every test binary; the first failure aborts
    pub(crate) fn run_tests(&self, binaries: &[PathBuf]) -> CovgenResult<()> {
        self.stage(Stage::RunTests);
        let total = binaries.len();

        for (i, binary) in binaries.iter().enumerate() {
            info!("Starting test: {}", binary.display());
            self.observer.test_started(i + 1, total, binary);
            run_checked(self.runner, &self.test_invocation(binary))?;
        }

        self.observer.tests_finished();
        Ok(())
    }
}
