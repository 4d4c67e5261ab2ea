//! Exit codes for mythwrap.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Run finished (analyzer findings do not count as failure by default) |
//! | 1 | `FAILURE` | Missing target, spawn failure, or failed pipeline step |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `ISSUES_FOUND` | Analyzer exited non-zero and `--fail-on-issues` was set |

/// Process exit code.
///
/// Use the named constants, or [`as_i32()`](Self::as_i32) to get the value
/// for `std::process::exit()`.
///
/// ```rust
/// use mythwrap_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::from_i32(1), ExitCode::FAILURE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Run finished normally
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Precondition or invocation failure
    pub const FAILURE: ExitCode = ExitCode(1);

    /// Invalid CLI arguments or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Analyzer reported issues and the caller asked for that to fail the run
    pub const ISSUES_FOUND: ExitCode = ExitCode(3);

    /// Get the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }

    /// Whether this is [`ExitCode::SUCCESS`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
