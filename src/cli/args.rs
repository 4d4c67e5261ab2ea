//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the subcommand enum.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use mythwrap_runner::RunMode;

/// mythwrap - run the Mythril symbolic analyzer over Solidity contracts
#[derive(Parser, Debug)]
#[command(name = "mythwrap")]
#[command(about = "Locate Solidity targets and run Mythril over them")]
#[command(long_about = r#"
mythwrap locates contract files by convention, writes the compiler config the
chosen preset needs, and runs `myth analyze` on each target, relaying its
output either after completion (capture) or line by line (stream).

EXAMPLES:
  # Analyze instrumented contracts with the default preset
  mythwrap

  # Quick streaming pass over contracts/**/*.sol
  mythwrap analyze --preset quick

  # Deep analysis of a single file, failing CI when issues are reported
  mythwrap analyze --preset deep --target contracts/Vault.sol --fail-on-issues

  # Pass extra flags straight through to the analyzer
  mythwrap analyze -- -m ether_thief,suicide

  # Show the exact argv each preset produces
  mythwrap presets

  # Instrument with Scribble, run Hardhat tests, then analyze
  mythwrap pipeline --analyze

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from the working directory
  for .mythwrap/config.toml. Use --config to specify an explicit path.

EXIT CODES:
  0  success (analyzer findings do not fail the run unless --fail-on-issues)
  1  no targets, analyzer could not be started, or a pipeline step failed
  2  invalid arguments or configuration
  3  analyzer reported issues and --fail-on-issues was given
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    pub workdir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the analyzer over the preset's targets (default command)
    ///
    /// EXAMPLES:
    ///   mythwrap analyze
    ///   mythwrap analyze --preset quick --mode capture
    ///   mythwrap analyze --target instrumented/Vault.sol -- --max-depth 5
    Analyze(AnalyzeArgs),

    /// List presets with their mode and analyzer invocation
    Presets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run environment health checks
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Instrument the contract with Scribble and run the Hardhat tests
    Pipeline {
        /// Continue into analysis when the tests pass
        #[arg(long)]
        analyze: bool,

        #[command(flatten)]
        analysis: AnalyzeArgs,
    },
}

/// Options shared by `analyze` and `pipeline --analyze`
#[derive(Args, Debug, Default, Clone)]
pub struct AnalyzeArgs {
    /// Preset to run (see `mythwrap presets`)
    #[arg(long)]
    pub preset: Option<String>,

    /// Output relay mode, overriding the preset
    #[arg(long, value_name = "capture|stream")]
    pub mode: Option<RunMode>,

    /// Analyzer program (default: myth)
    #[arg(long, value_name = "PATH")]
    pub analyzer: Option<String>,

    /// Exit with code 3 when the analyzer reports issues
    #[arg(long)]
    pub fail_on_issues: bool,

    /// Analyze this file instead of locating targets (repeatable)
    #[arg(long = "target", value_name = "PATH")]
    pub targets: Vec<PathBuf>,

    /// Extra arguments passed to the analyzer after the preset flags
    #[arg(last = true, value_name = "EXTRA")]
    pub extra: Vec<String>,
}

/// Build the CLI command structure without parsing arguments
/// This is used for introspection in tests
#[must_use]
pub fn build_cli() -> clap::Command {
    <Cli as clap::CommandFactory>::command()
}
