use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use mythwrap_runner::RunnerError;

use crate::exit_codes::ExitCode;

/// Library-level error type.
///
/// Every failure the CLI can report funnels into this enum, and
/// [`to_exit_code()`](Self::to_exit_code) decides the process exit status.
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 1 | Missing target, runner failure, failed pipeline step, I/O |
/// | 2 | Configuration/CLI argument errors |
/// | 3 | Analyzer issues, when the run was asked to fail on them |
///
/// Library code returns `MythwrapError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug)]
pub enum MythwrapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No target files found (searched: {})", searched.join(", "))]
    NoTargets { searched: Vec<String> },

    #[error("Target file does not exist: {}", path.display())]
    TargetMissing { path: PathBuf },

    #[error("Error running analyzer: {0}")]
    Runner(#[from] RunnerError),

    #[error("Failed to write config artifact {}: {reason}", path.display())]
    ArtifactWrite { path: PathBuf, reason: String },

    #[error("Step '{step}' failed: {detail}")]
    StepFailed { step: String, detail: String },

    #[error("Analyzer reported issues for {count} target(s)")]
    IssuesFound { count: usize },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Unknown preset '{name}' (available: {})", available.join(", "))]
    UnknownPreset {
        name: String,
        available: Vec<String>,
    },
}

/// Extra text shown to a person reading an error, beyond its `Display`.
pub trait UserFriendlyError {
    /// Short actionable hints, possibly empty.
    fn suggestions(&self) -> Vec<String>;
}

impl UserFriendlyError for ConfigError {
    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check .mythwrap/config.toml for TOML syntax errors".to_string(),
            ],
            Self::InvalidValue { key, .. } => vec![format!("Fix or remove '{key}'")],
            Self::NotFound { .. } => vec![
                "Pass an existing file to --config, or drop the flag to use discovery".to_string(),
            ],
            Self::UnknownPreset { .. } => {
                vec!["Run 'mythwrap presets' to list available presets".to_string()]
            }
        }
    }
}

impl UserFriendlyError for MythwrapError {
    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::NoTargets { .. } => vec![
                "Run 'mythwrap pipeline' to produce instrumented contracts".to_string(),
                "Or pass --target <path> explicitly".to_string(),
            ],
            Self::Runner(RunnerError::SpawnFailed { program, .. }) => vec![
                format!("Ensure '{program}' is installed and on PATH (pip install mythril)"),
                "Run 'mythwrap doctor' to check the environment".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

impl MythwrapError {
    /// Map this error to the process exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::IssuesFound { .. } => ExitCode::ISSUES_FOUND,
            Self::NoTargets { .. }
            | Self::TargetMissing { .. }
            | Self::Runner(_)
            | Self::ArtifactWrite { .. }
            | Self::StepFailed { .. }
            | Self::Io(_) => ExitCode::FAILURE,
        }
    }

    /// Message plus suggestions, ready for stderr.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut out = format!("Error: {self}");
        for hint in self.suggestions() {
            out.push_str("\n  - ");
            out.push_str(&hint);
        }
        out
    }
}
