//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Initializes logging
//! - Builds CliArgs and discovers Config
//! - Dispatches to command handlers
//! - Handles all error output

use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use super::args::{AnalyzeArgs, Cli, Commands};
use super::commands;

use crate::logging;
use crate::{CliArgs, Config, ExitCode, MythwrapError};

/// Main CLI execution function.
///
/// This function handles ALL output including errors. It returns `Result<(), ExitCode>`:
/// - On success: returns `Ok(())` after printing any output
/// - On error: prints the error with suggestions to stderr, returns `Err(ExitCode)`
///
/// main.rs only calls `std::process::exit(code.as_i32())` on error - it does NOT print.
pub fn run() -> Result<(), ExitCode> {
    run_with(Cli::parse())
}

/// Run an already parsed command line.
pub fn run_with(cli: Cli) -> Result<(), ExitCode> {
    if let Err(e) = logging::init_tracing(cli.verbose) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", err.display_for_user());
            err.to_exit_code()
        }
    };

    if code.is_success() { Ok(()) } else { Err(code) }
}

fn dispatch(cli: Cli) -> Result<ExitCode, MythwrapError> {
    // Relative program paths and the child cwd are both anchored here
    let base_dir = match cli.workdir {
        Some(dir) => std::path::absolute(dir)?,
        None => std::env::current_dir()?,
    };

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Analyze(AnalyzeArgs::default()));
    let analysis = match &command {
        Commands::Analyze(args) | Commands::Pipeline { analysis: args, .. } => Some(args),
        Commands::Presets { .. } | Commands::Doctor { .. } => None,
    };

    let cli_args = build_cli_args(cli.config, analysis);
    let config = Config::discover_from(&base_dir, &cli_args)?;
    debug!(
        base_dir = %base_dir.display(),
        config = ?config.config_path,
        analyzer = %config.analyzer.binary,
        analyzer_source = %config.source_of("binary"),
        "Configuration loaded"
    );

    match &command {
        Commands::Analyze(args) => commands::execute_analyze_command(args, &config, &base_dir),
        Commands::Presets { json } => commands::execute_presets_command(*json, &config),
        Commands::Doctor { json } => commands::execute_doctor_command(*json, &config, &base_dir),
        Commands::Pipeline { analyze, analysis } => {
            commands::execute_pipeline_command(*analyze, analysis, &config, &base_dir)
        }
    }
}

fn build_cli_args(config_path: Option<PathBuf>, analysis: Option<&AnalyzeArgs>) -> CliArgs {
    let mut cli_args = CliArgs {
        config_path,
        ..Default::default()
    };
    if let Some(args) = analysis {
        cli_args.analyzer.clone_from(&args.analyzer);
        cli_args.mode = args.mode;
        cli_args.preset.clone_from(&args.preset);
        cli_args.fail_on_issues = args.fail_on_issues;
    }
    cli_args
}

#[cfg(test)]
mod tests {
    use super::*;
    use mythwrap_runner::RunMode;

    #[test]
    fn test_build_cli_args_without_analysis_flags() {
        let cli_args = build_cli_args(Some(PathBuf::from("x.toml")), None);
        assert_eq!(cli_args.config_path, Some(PathBuf::from("x.toml")));
        assert!(cli_args.analyzer.is_none());
        assert!(cli_args.preset.is_none());
        assert!(!cli_args.fail_on_issues);
    }

    #[test]
    fn test_build_cli_args_carries_analysis_flags() {
        let args = AnalyzeArgs {
            preset: Some("deep".to_string()),
            mode: Some(RunMode::Capture),
            analyzer: Some("./bin/myth".to_string()),
            fail_on_issues: true,
            ..Default::default()
        };
        let cli_args = build_cli_args(None, Some(&args));
        assert_eq!(cli_args.preset.as_deref(), Some("deep"));
        assert_eq!(cli_args.mode, Some(RunMode::Capture));
        assert_eq!(cli_args.analyzer.as_deref(), Some("./bin/myth"));
        assert!(cli_args.fail_on_issues);
    }
}
