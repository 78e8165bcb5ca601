//! Detect command handler

use crate::commands::{DetectArgs, OutputFormatArg};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use covgen::{survey_environment, Environment, ProcessRunner, SystemRunner, Toolchain};

/// Render a tool survey in the requested format
pub fn render_environment(env: &Environment, format: OutputFormatArg) -> CliResult<String> {
    match format {
        OutputFormatArg::Text => Ok(env.report()),
        OutputFormatArg::Json => Ok(serde_json::to_string_pretty(env)? + "\n"),
    }
}

/// Probe every tool the selected toolchain needs
pub fn detect(
    runner: &dyn ProcessRunner,
    host_is_windows: bool,
    args: &DetectArgs,
) -> CliResult<Environment> {
    let toolchain = Toolchain::new(
        args.toolchain.compiler.into(),
        args.toolchain.report_tool.into(),
    );
    toolchain.validate()?;
    Ok(survey_environment(
        runner,
        &toolchain,
        args.toolchain.shell.into(),
        host_is_windows,
    ))
}

/// Execute the detect command; fails when anything is missing
pub fn execute_detect(_config: &CliConfig, args: &DetectArgs) -> CliResult<()> {
    let env = detect(&SystemRunner, cfg!(windows), args)?;
    print!("{}", render_environment(&env, args.format)?);

    let missing: Vec<String> = env
        .tools
        .iter()
        .filter(|t| !t.found)
        .map(|t| t.name.clone())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CliError::MissingTools { tools: missing })
    }
}
