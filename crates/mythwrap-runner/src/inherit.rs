use crate::error::RunnerError;
use std::process::Stdio;
use tracing::debug;

use super::CommandSpec;

/// Runner that hands the terminal to the child.
///
/// Stdin, stdout and stderr are inherited, so the child's output reaches the
/// console directly and nothing is captured. Used for the instrumentation and
/// test steps of the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct InheritRunner;

impl InheritRunner {
    /// Create a new `InheritRunner`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run `cmd` to completion and return its exit code (None if killed by a signal).
    pub fn run(&self, cmd: &CommandSpec) -> Result<Option<i32>, RunnerError> {
        let program = cmd.program_name();

        let mut command = cmd.to_command();
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        debug!(argv = ?cmd.argv(), "Spawning process (inherit)");

        let status = command
            .status()
            .map_err(|e| RunnerError::SpawnFailed {
                program,
                reason: e.to_string(),
            })?;

        Ok(status.code())
    }
}
