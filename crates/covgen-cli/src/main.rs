//! covgen: HTML code coverage reports from instrumented test applications
//!
//! ## Usage
//!
//! ```bash
//! covgen run -i build                       # Run tests, render docs/coverage
//! covgen run --compiler gcc -e '/usr/*'     # gcov data, drop system headers
//! covgen discover -i build --format json    # List test applications
//! covgen clean -i build                     # Delete stale coverage artifacts
//! covgen detect                             # Check installed tools
//! ```

use clap::Parser;
use covgen_cli::{
    handlers::{execute_clean, execute_detect, execute_discover, execute_run},
    init_logging, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(config.verbosity);

    match cli.command {
        Commands::Run(args) => execute_run(&config, &args),
        Commands::Discover(args) => execute_discover(&config, &args),
        Commands::Clean(args) => execute_clean(&config, &args),
        Commands::Detect(args) => execute_detect(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.verbose, cli.quiet))
        .with_color(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_quiet() {
        let cli = Cli::parse_from(["covgen", "-q", "detect"]);
        let config = build_config(&cli);
        assert!(config.verbosity.is_quiet());
    }

    #[test]
    fn test_build_config_verbose_and_color() {
        let cli = Cli::parse_from(["covgen", "-v", "--color", "never", "clean"]);
        let config = build_config(&cli);
        assert_eq!(config.verbosity, Verbosity::Verbose);
        assert_eq!(config.color, ColorChoice::Never);
    }
}
