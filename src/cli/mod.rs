//! Command-line interface for mythwrap
//!
//! ## Module Structure
//!
//! - `args`: CLI argument definitions and parsing structures (clap)
//! - `run`: Main entry point and command dispatch
//! - `commands`: Command implementations

pub mod args;
mod commands;
mod run;

pub use args::{AnalyzeArgs, Cli, Commands, build_cli};
pub use run::{run, run_with};
