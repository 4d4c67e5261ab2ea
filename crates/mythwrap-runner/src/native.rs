use crate::error::RunnerError;
use std::process::Stdio;
use tracing::debug;

use super::{CommandSpec, ProcessOutput, ProcessRunner};

// ============================================================================
// NativeRunner - blocking capture mode
// ============================================================================

/// Blocking capture runner using `std::process::Command`.
///
/// Spawns the child with stdin closed and both output streams piped, waits
/// for it to exit, and returns stdout and stderr as complete buffers.
/// `wait_with_output` reads both pipes concurrently, so a chatty stderr
/// cannot stall the child.
///
/// # Example
///
/// ```rust,no_run
/// use mythwrap_runner::{CommandSpec, NativeRunner, ProcessRunner};
///
/// let runner = NativeRunner::new();
/// let cmd = CommandSpec::new("myth").arg("version");
///
/// let output = runner.run(&cmd).unwrap();
/// println!("{}", output.stdout_string());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    /// Create a new `NativeRunner`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for NativeRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
        let program = cmd.program_name();

        let mut command = cmd.to_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(argv = ?cmd.argv(), "Spawning process (capture)");

        let child = command.spawn().map_err(|e| RunnerError::SpawnFailed {
            program: program.clone(),
            reason: e.to_string(),
        })?;

        let output = child
            .wait_with_output()
            .map_err(|e| RunnerError::WaitFailed {
                program,
                reason: e.to_string(),
            })?;

        Ok(ProcessOutput::new(
            output.stdout,
            output.stderr,
            output.status.code(),
        ))
    }
}
