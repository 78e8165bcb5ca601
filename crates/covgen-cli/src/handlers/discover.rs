//! Discover command handler

use crate::commands::{DiscoverArgs, OutputFormatArg};
use crate::config::CliConfig;
use crate::error::CliResult;
use covgen::find_test_binaries;
use std::path::{Path, PathBuf};

/// Render the discovered binaries in the requested format
pub fn render_discovery(
    root: &Path,
    binaries: &[PathBuf],
    format: OutputFormatArg,
) -> CliResult<String> {
    match format {
        OutputFormatArg::Text => {
            let mut out = String::new();
            for binary in binaries {
                out.push_str(&binary.display().to_string());
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormatArg::Json => {
            let doc = serde_json::json!({
                "root": root,
                "binaries": binaries,
            });
            Ok(serde_json::to_string_pretty(&doc)? + "\n")
        }
    }
}

/// Execute the discover command
pub fn execute_discover(_config: &CliConfig, args: &DiscoverArgs) -> CliResult<()> {
    let root = &args.project.root_dir;
    let binaries = find_test_binaries(root, &args.project.pattern)?;
    print!("{}", render_discovery(root, &binaries, args.format)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn binaries() -> Vec<PathBuf> {
        vec![
            PathBuf::from("build/list/test_list"),
            PathBuf::from("build/test_stack"),
        ]
    }

    #[test]
    fn test_render_text_one_per_line() {
        let out = render_discovery(Path::new("build"), &binaries(), OutputFormatArg::Text).unwrap();
        assert_eq!(out, "build/list/test_list\nbuild/test_stack\n");
    }

    #[test]
    fn test_render_json() {
        let out = render_discovery(Path::new("build"), &binaries(), OutputFormatArg::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["root"], "build");
        assert_eq!(value["binaries"][1], "build/test_stack");
    }

    #[test]
    fn test_render_empty_text() {
        let out = render_discovery(Path::new("."), &[], OutputFormatArg::Text).unwrap();
        assert!(out.is_empty());
    }
}
