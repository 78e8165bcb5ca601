//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use covgen::{
    Compiler, ReportTool, ShellMode, DEFAULT_REPORT_DIR, DEFAULT_REPORT_NAME,
    DEFAULT_SUMMARY_PATH, DEFAULT_TEST_FRAGMENT,
};
use std::path::PathBuf;

/// covgen: run instrumented test binaries and render an HTML coverage report
///
/// Test applications need to be compiled with coverage flags and carry the
/// name fragment ('test' by default) in their file name for automatic
/// discovery. Depending on the flags used, the report covers branches,
/// functions and lines.
#[derive(Parser, Debug)]
#[command(name = "covgen")]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run tests and generate the HTML coverage report
    Run(RunArgs),

    /// List the test applications that would be run
    Discover(DiscoverArgs),

    /// Delete intermediate coverage artifacts from previous runs
    Clean(CleanArgs),

    /// Check that the required coverage tools are installed
    Detect(DetectArgs),
}

/// Where and how test applications are discovered
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Root path for test discovery and artifact cleanup
    #[arg(short = 'i', long, env = "COVGEN_ROOT_DIR", default_value = ".")]
    pub root_dir: PathBuf,

    /// Fragment test application names must contain (case-insensitive)
    #[arg(long, env = "COVGEN_PATTERN", default_value = DEFAULT_TEST_FRAGMENT)]
    pub pattern: String,
}

/// Compiler, renderer and shell selection
#[derive(Args, Debug, Clone)]
pub struct ToolchainArgs {
    /// Compiler the test applications were instrumented with
    #[arg(long, env = "COVGEN_COMPILER", default_value = "clang")]
    pub compiler: CompilerArg,

    /// Tool rendering the HTML report
    #[arg(long, env = "COVGEN_REPORT_TOOL", default_value = "genhtml")]
    pub report_tool: ReportToolArg,

    /// Run Linux-only tools through WSL (auto: only on Windows hosts)
    #[arg(long, env = "COVGEN_SHELL", default_value = "auto")]
    pub shell: ShellArg,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub toolchain: ToolchainArgs,

    /// Folder to store coverage data and the HTML report
    #[arg(short = 'o', long, env = "COVGEN_REPORT_DIR", default_value = DEFAULT_REPORT_DIR)]
    pub report_dir: PathBuf,

    /// File name for the merged coverage tracefile
    #[arg(short = 'n', long, env = "COVGEN_REPORT_NAME", default_value = DEFAULT_REPORT_NAME)]
    pub report_name: String,

    /// Source file pattern to drop from the report (repeatable)
    #[arg(short = 'e', long = "exclude", value_name = "PATTERN", env = "COVGEN_EXCLUDE")]
    pub excludes: Vec<String>,

    /// Markdown summary location, relative to the root dir
    #[arg(long, env = "COVGEN_SUMMARY", default_value = DEFAULT_SUMMARY_PATH)]
    pub summary: PathBuf,
}

/// Arguments for the discover command
#[derive(Parser, Debug)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormatArg,
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Root path to clean
    #[arg(short = 'i', long, env = "COVGEN_ROOT_DIR", default_value = ".")]
    pub root_dir: PathBuf,

    /// Compiler whose artifacts are removed
    #[arg(long, env = "COVGEN_COMPILER", default_value = "clang")]
    pub compiler: CompilerArg,
}

/// Arguments for the detect command
#[derive(Parser, Debug)]
pub struct DetectArgs {
    #[command(flatten)]
    pub toolchain: ToolchainArgs,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormatArg,
}

/// Compiler family
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompilerArg {
    /// clang / LLVM source-based coverage
    #[default]
    Clang,
    /// gcc / gcov
    Gcc,
}

impl From<CompilerArg> for Compiler {
    fn from(arg: CompilerArg) -> Self {
        match arg {
            CompilerArg::Clang => Self::Clang,
            CompilerArg::Gcc => Self::Gcc,
        }
    }
}

/// HTML renderer
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportToolArg {
    /// genhtml from the lcov package
    #[default]
    Genhtml,
    /// llvm-cov show (clang only)
    LlvmCov,
}

impl From<ReportToolArg> for ReportTool {
    fn from(arg: ReportToolArg) -> Self {
        match arg {
            ReportToolArg::Genhtml => Self::Genhtml,
            ReportToolArg::LlvmCov => Self::LlvmCov,
        }
    }
}

/// Compatibility shell selection
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShellArg {
    /// WSL on Windows hosts, native elsewhere
    #[default]
    Auto,
    /// Always run tools directly
    Native,
    /// Always run Linux-only tools through WSL
    Wsl,
}

impl From<ShellArg> for ShellMode {
    fn from(arg: ShellArg) -> Self {
        match arg {
            ShellArg::Auto => Self::Auto,
            ShellArg::Native => Self::Native,
            ShellArg::Wsl => Self::Wsl,
        }
    }
}

/// Machine- or human-readable listing
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormatArg {
    /// One entry per line
    #[default]
    Text,
    /// JSON document
    Json,
}

/// Color output argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_verify_cli() {
            use clap::CommandFactory;
            Cli::command().debug_assert();
        }

        #[test]
        fn test_parse_run_defaults() {
            let cli = Cli::parse_from(["covgen", "run"]);
            if let Commands::Run(args) = cli.command {
                assert_eq!(args.project.root_dir, PathBuf::from("."));
                assert_eq!(args.project.pattern, "test");
                assert_eq!(args.report_dir, PathBuf::from("docs/coverage"));
                assert_eq!(args.report_name, "coverage.info");
                assert_eq!(args.summary, PathBuf::from("docs/COVERAGE.md"));
                assert_eq!(args.toolchain.compiler, CompilerArg::Clang);
                assert_eq!(args.toolchain.report_tool, ReportToolArg::Genhtml);
                assert_eq!(args.toolchain.shell, ShellArg::Auto);
                assert!(args.excludes.is_empty());
            } else {
                panic!("expected Run command");
            }
        }

        #[test]
        fn test_parse_run_with_options() {
            let cli = Cli::parse_from([
                "covgen",
                "run",
                "-i",
                "build",
                "-o",
                "out/cov",
                "-n",
                "all.info",
                "--compiler",
                "gcc",
                "--shell",
                "wsl",
                "-e",
                "/usr/*",
                "--exclude",
                "*/tests/*",
            ]);
            if let Commands::Run(args) = cli.command {
                assert_eq!(args.project.root_dir, PathBuf::from("build"));
                assert_eq!(args.report_dir, PathBuf::from("out/cov"));
                assert_eq!(args.report_name, "all.info");
                assert_eq!(args.toolchain.compiler, CompilerArg::Gcc);
                assert_eq!(args.toolchain.shell, ShellArg::Wsl);
                assert_eq!(args.excludes, vec!["/usr/*", "*/tests/*"]);
            } else {
                panic!("expected Run command");
            }
        }

        #[test]
        fn test_exclude_keeps_commas() {
            let cli = Cli::parse_from([
                "covgen",
                "run",
                "-e",
                "x{1,2}",
                "-e",
                "(a|b),c",
            ]);
            if let Commands::Run(args) = cli.command {
                assert_eq!(args.excludes, vec!["x{1,2}", "(a|b),c"]);
            } else {
                panic!("expected Run command");
            }
        }

        #[test]
        fn test_parse_report_tool() {
            let cli = Cli::parse_from(["covgen", "run", "--report-tool", "llvm-cov"]);
            if let Commands::Run(args) = cli.command {
                assert_eq!(args.toolchain.report_tool, ReportToolArg::LlvmCov);
            } else {
                panic!("expected Run command");
            }
        }

        #[test]
        fn test_parse_discover_json() {
            let cli = Cli::parse_from(["covgen", "discover", "--format", "json", "--pattern", "check"]);
            if let Commands::Discover(args) = cli.command {
                assert_eq!(args.format, OutputFormatArg::Json);
                assert_eq!(args.project.pattern, "check");
            } else {
                panic!("expected Discover command");
            }
        }

        #[test]
        fn test_parse_clean() {
            let cli = Cli::parse_from(["covgen", "clean", "--compiler", "gcc"]);
            assert!(matches!(
                cli.command,
                Commands::Clean(CleanArgs {
                    compiler: CompilerArg::Gcc,
                    ..
                })
            ));
        }

        #[test]
        fn test_parse_detect() {
            let cli = Cli::parse_from(["covgen", "detect"]);
            assert!(matches!(cli.command, Commands::Detect(_)));
        }

        #[test]
        fn test_invalid_compiler_rejected() {
            assert!(Cli::try_parse_from(["covgen", "run", "--compiler", "msvc"]).is_err());
        }

        #[test]
        fn test_global_verbose_flag() {
            let cli = Cli::parse_from(["covgen", "-vv", "run"]);
            assert_eq!(cli.verbose, 2);
        }

        #[test]
        fn test_global_quiet_flag() {
            let cli = Cli::parse_from(["covgen", "run", "-q"]);
            assert!(cli.quiet);
        }

        #[test]
        fn test_global_color_flag() {
            let cli = Cli::parse_from(["covgen", "--color", "never", "detect"]);
            assert!(matches!(cli.color, ColorArg::Never));
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_compiler_conversion() {
            assert_eq!(Compiler::from(CompilerArg::Clang), Compiler::Clang);
            assert_eq!(Compiler::from(CompilerArg::Gcc), Compiler::Gcc);
        }

        #[test]
        fn test_report_tool_conversion() {
            assert_eq!(ReportTool::from(ReportToolArg::LlvmCov), ReportTool::LlvmCov);
            assert_eq!(ReportTool::from(ReportToolArg::Genhtml), ReportTool::Genhtml);
        }

        #[test]
        fn test_shell_conversion() {
            assert_eq!(ShellMode::from(ShellArg::Auto), ShellMode::Auto);
            assert_eq!(ShellMode::from(ShellArg::Native), ShellMode::Native);
            assert_eq!(ShellMode::from(ShellArg::Wsl), ShellMode::Wsl);
        }

        #[test]
        fn test_color_arg_conversion() {
            use crate::config::ColorChoice;

            let auto: ColorChoice = ColorArg::Auto.into();
            assert!(matches!(auto, ColorChoice::Auto));

            let always: ColorChoice = ColorArg::Always.into();
            assert!(matches!(always, ColorChoice::Always));

            let never: ColorChoice = ColorArg::Never.into();
            assert!(matches!(never, ColorChoice::Never));
        }
    }
}
