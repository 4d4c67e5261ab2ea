use crate::error::RunnerError;

use super::CommandSpec;

// ============================================================================
// ProcessRunner Trait - blocking capture execution
// ============================================================================

/// Output from a process run in blocking capture mode.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Standard output from the process
    pub stdout: Vec<u8>,
    /// Standard error from the process
    pub stderr: Vec<u8>,
    /// Exit code from the process (None if terminated by signal)
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    /// Create a new `ProcessOutput` with the given values.
    #[must_use]
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>, exit_code: Option<i32>) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
        }
    }

    /// Get stdout as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    /// Check if the process exited successfully (exit code 0).
    ///
    /// A process killed by a signal has no exit code and is not a success.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Trait for blocking process execution.
///
/// Implementations MUST use argv-style APIs only (no shell string evaluation)
/// and MUST NOT enforce a timeout of their own: the child runs until it exits
/// or the environment kills it.
///
/// # Example
///
/// ```rust
/// use mythwrap_runner::{CommandSpec, ProcessOutput, ProcessRunner, RunnerError};
///
/// struct CannedRunner;
///
/// impl ProcessRunner for CannedRunner {
///     fn run(&self, _cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
///         Ok(ProcessOutput::new(b"ok\n".to_vec(), Vec::new(), Some(0)))
///     }
/// }
///
/// let output = CannedRunner.run(&CommandSpec::new("myth")).unwrap();
/// assert!(output.success());
/// ```
pub trait ProcessRunner {
    /// Execute a command to completion and capture its output.
    ///
    /// # Returns
    ///
    /// * `Ok(ProcessOutput)` - The process completed (possibly with non-zero exit code)
    /// * `Err(RunnerError::*)` - The process could not be spawned or waited on
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_output_strings() {
        let output = ProcessOutput::new(b"report".to_vec(), b"warning".to_vec(), Some(1));
        assert_eq!(output.stdout_string(), "report");
        assert_eq!(output.stderr_string(), "warning");
    }

    #[test]
    fn test_process_output_success() {
        assert!(ProcessOutput::new(Vec::new(), Vec::new(), Some(0)).success());
        assert!(!ProcessOutput::new(Vec::new(), Vec::new(), Some(1)).success());
        // Killed by signal
        assert!(!ProcessOutput::new(Vec::new(), Vec::new(), None).success());
    }

    #[test]
    fn test_process_output_lossy_utf8() {
        let invalid_utf8 = vec![0xff, 0xfe, 0x00, 0x01];
        let output = ProcessOutput::new(invalid_utf8.clone(), invalid_utf8, Some(0));
        assert!(!output.stdout_string().is_empty());
        assert!(!output.stderr_string().is_empty());
    }

    /// A mock implementation of ProcessRunner for testing
    struct MockRunner {
        expected_output: ProcessOutput,
    }

    impl ProcessRunner for MockRunner {
        fn run(&self, _cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
            Ok(self.expected_output.clone())
        }
    }

    #[test]
    fn test_process_runner_trait_implementation() {
        let mock = MockRunner {
            expected_output: ProcessOutput::new(b"mock stdout".to_vec(), Vec::new(), Some(0)),
        };

        let cmd = CommandSpec::new("myth").arg("analyze");
        let output = mock.run(&cmd).unwrap();
        assert_eq!(output.stdout_string(), "mock stdout");
        assert!(output.success());
    }

    #[test]
    fn test_process_runner_with_error() {
        struct ErrorRunner;

        impl ProcessRunner for ErrorRunner {
            fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, RunnerError> {
                Err(RunnerError::SpawnFailed {
                    program: cmd.program_name(),
                    reason: "mock error".to_string(),
                })
            }
        }

        match ErrorRunner.run(&CommandSpec::new("myth")) {
            Err(RunnerError::SpawnFailed { program, reason }) => {
                assert_eq!(program, "myth");
                assert_eq!(reason, "mock error");
            }
            other => panic!("Expected SpawnFailed error, got {other:?}"),
        }
    }
}
