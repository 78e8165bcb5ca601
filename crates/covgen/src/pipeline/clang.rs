//! LLVM profile stages: `.profraw` → `.profdata` → `.lcov`

use super::{Pipeline, Stage};
use crate::artifacts::sibling;
use crate::process::{native_arg, run_checked, Invocation};
use crate::result::{CovgenError, CovgenResult};
use std::path::{Path, PathBuf};

impl Pipeline<'_> {
    pub(crate) fn merge_invocation(binary: &Path) -> Invocation {
        Invocation::new("llvm-profdata")
            .args(["merge", "-sparse"])
            .arg(native_arg(&sibling(binary, "profraw")))
            .arg("-o")
            .arg(native_arg(&sibling(binary, "profdata")))
    }

    pub(crate) fn export_invocation(binary: &Path) -> Invocation {
        Invocation::new("llvm-cov")
            .args(["export", "--format=lcov"])
            .arg(native_arg(binary))
            .arg(format!(
                "-instr-profile={}",
                native_arg(&sibling(binary, "profdata"))
            ))
            .stdout_to(sibling(binary, "lcov"))
    }

    /// Index each binary's raw profile into a `.profdata` next to it
    pub(crate) fn merge_profiles(&self, binaries: &[PathBuf]) -> CovgenResult<()> {
        self.stage(Stage::MergeProfiles);

        for binary in binaries {
            let profraw = sibling(binary, "profraw");
            if !profraw.is_file() {
                return Err(CovgenError::missing_artifact(".profraw", profraw));
            }
            run_checked(self.runner, &Self::merge_invocation(binary))?;
        }
        Ok(())
    }

    /// Export each `.profdata` as an lcov `.lcov` file
    pub(crate) fn export_lcov(&self, binaries: &[PathBuf]) -> CovgenResult<()> {
        self.stage(Stage::ExportLcov);

        for binary in binaries {
            let profdata = sibling(binary, "profdata");
            if !profdata.is_file() {
                return Err(CovgenError::missing_artifact(".profdata", profdata));
            }
            run_checked(self.runner, &Self::export_invocation(binary))?;
        }
        Ok(())
    }
}
