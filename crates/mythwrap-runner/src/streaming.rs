use crate::error::RunnerError;
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Stdio};
use tracing::{debug, warn};

use super::CommandSpec;

// ============================================================================
// StreamingRunner - live line relay
// ============================================================================

/// Result of a streamed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Exit code from the process (None if terminated by signal)
    pub exit_code: Option<i32>,
    /// Everything the child wrote to stderr, drained after stdout closed
    pub stderr: Vec<u8>,
    /// Number of stdout lines handed to the sink
    pub lines: usize,
}

impl StreamOutcome {
    /// Check if the process exited successfully (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Get stderr as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}

/// Runner that relays the child's stdout one line at a time.
///
/// The read loop blocks on each line until data arrives or the pipe closes.
/// Once stdout reaches end-of-stream, stderr is drained in one shot and the
/// child is reaped, so every byte the child wrote has been read before the
/// exit code is looked at. There is no timeout and no early abort.
///
/// Stderr is only read after stdout closes. A child that fills the stderr
/// pipe buffer while keeping stdout open will block until it is killed.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingRunner;

impl StreamingRunner {
    /// Create a new `StreamingRunner`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run `cmd`, calling `sink` with each stdout line (terminator removed)
    /// as soon as it is read.
    ///
    /// A final line without a trailing newline is still delivered. Invalid
    /// UTF-8 is replaced lossily. If `sink` fails, the child is killed and
    /// [`RunnerError::SinkFailed`] is returned.
    pub fn run<F>(&self, cmd: &CommandSpec, mut sink: F) -> Result<StreamOutcome, RunnerError>
    where
        F: FnMut(&str) -> io::Result<()>,
    {
        let program = cmd.program_name();

        let mut command = cmd.to_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(argv = ?cmd.argv(), "Spawning process (stream)");

        let mut child = command.spawn().map_err(|e| RunnerError::SpawnFailed {
            program: program.clone(),
            reason: e.to_string(),
        })?;

        let pipe_err = |reason: String| RunnerError::PipeFailed {
            program: program.clone(),
            reason,
        };

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| pipe_err("stdout was not captured".to_string()))?;
        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        let mut lines = 0usize;

        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).map_err(|e| {
                reap(&mut child);
                pipe_err(e.to_string())
            })?;
            if read == 0 {
                break;
            }

            let text = String::from_utf8_lossy(&buf);
            if let Err(e) = sink(strip_line_ending(&text)) {
                reap(&mut child);
                return Err(RunnerError::SinkFailed {
                    reason: e.to_string(),
                });
            }
            lines += 1;
        }

        let mut stderr = Vec::new();
        if let Some(mut pipe) = child.stderr.take() {
            pipe.read_to_end(&mut stderr).map_err(|e| {
                reap(&mut child);
                pipe_err(e.to_string())
            })?;
        }

        let status = child.wait().map_err(|e| RunnerError::WaitFailed {
            program: program.clone(),
            reason: e.to_string(),
        })?;

        Ok(StreamOutcome {
            exit_code: status.code(),
            stderr,
            lines,
        })
    }
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Kill and reap a child after a local failure so it does not linger.
fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        warn!(error = %e, "Failed to kill child process");
    }
    if let Err(e) = child.wait() {
        warn!(error = %e, "Failed to reap child process");
    }
}
