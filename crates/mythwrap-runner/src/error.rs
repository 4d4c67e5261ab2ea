//! Error types for runner module

use thiserror::Error;

/// Errors raised while spawning or talking to a child process.
///
/// A child that runs and exits non-zero is NOT an error; that is reported
/// through the exit code on [`crate::ProcessOutput`] or [`crate::StreamOutcome`].
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to spawn process '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Failed to read output of '{program}': {reason}")]
    PipeFailed { program: String, reason: String },

    #[error("Failed to wait for process '{program}': {reason}")]
    WaitFailed { program: String, reason: String },

    #[error("Failed to write output: {reason}")]
    SinkFailed { reason: String },
}

impl RunnerError {
    /// Name of the program involved, when there is one.
    #[must_use]
    pub fn program(&self) -> Option<&str> {
        match self {
            Self::SpawnFailed { program, .. }
            | Self::PipeFailed { program, .. }
            | Self::WaitFailed { program, .. } => Some(program),
            Self::SinkFailed { .. } => None,
        }
    }
}
