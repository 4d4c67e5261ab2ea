//! mythwrap - run the Mythril symbolic analyzer over Solidity contracts
//!
//! mythwrap finds the contracts to analyze by convention, writes the
//! compiler config a preset asks for and spawns `myth analyze` once per
//! target, relaying the analyzer's output either after it exits
//! ([`RunMode::Capture`]) or line by line as it is produced
//! ([`RunMode::Stream`]).
//!
//! ```bash
//! # Default preset: instrumented/**/*.sol, then contracts/**/*.sol.instrumented
//! mythwrap
//!
//! # Streaming preset with a generated config/solc.json
//! mythwrap analyze --preset quick
//!
//! # Environment checks
//! mythwrap doctor --json
//! ```
//!
//! The building blocks live in workspace crates and are re-exported here:
//! process execution in `mythwrap-runner`, presets and configuration in
//! `mythwrap-config`, and error and exit-code types in `mythwrap-utils`.

pub mod analysis;
pub mod cli;
pub mod pipeline;

pub use mythwrap_config::{
    CliArgs, Config, Preset, SolcConfig, TargetCandidate, TargetRule, builtin_presets,
};
pub use mythwrap_doctor::DoctorCommand;
pub use mythwrap_runner::{CommandSpec, RunMode, RunnerError};
pub use mythwrap_utils::{ConfigError, ExitCode, MythwrapError, UserFriendlyError};

#[doc(hidden)]
pub use mythwrap_utils::logging;
