//! Logging infrastructure for mythwrap
//!
//! Diagnostics go through `tracing` and are written to stderr. The analyzer's
//! own output is relayed on stdout by the caller and never passes through
//! the subscriber.

use std::io::IsTerminal;
use std::time::Duration;
use tracing::{Level, info, span, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Check if colored output should be used.
///
/// Returns true only if stderr is a terminal and `NO_COLOR` is not set.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Filter used when `RUST_LOG` is not set.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "mythwrap=debug,info"
    } else {
        "mythwrap=info,warn"
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`. Calling this twice returns an
/// error from the second call and leaves the first subscriber in place.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(use_color())
                .with_target(verbose)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(false)
                .with_file(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

/// Span covering one analyzer invocation.
pub fn analysis_span(preset: &str, target: &str, mode: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "analysis",
        preset = %preset,
        target_file = %target,
        mode = %mode,
    )
}

/// Log the end of one analyzer invocation.
pub fn log_analysis_complete(target: &str, exit_code: Option<i32>, elapsed: Duration) {
    let duration_ms = elapsed.as_millis();
    match exit_code {
        Some(0) => info!(target_file = %target, exit_code = 0, duration_ms = %duration_ms, "Analyzer finished"),
        Some(code) => warn!(target_file = %target, exit_code = code, duration_ms = %duration_ms, "Analyzer reported issues"),
        None => warn!(target_file = %target, duration_ms = %duration_ms, "Analyzer terminated by signal"),
    }
}
