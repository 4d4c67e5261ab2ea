//! Analyze command implementation
//!
//! Handles `mythwrap analyze` and the bare `mythwrap` invocation.

use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::analysis::{self, AnalysisRequest};
use crate::cli::args::AnalyzeArgs;
use crate::{Config, ExitCode, MythwrapError, UserFriendlyError};

/// Execute the analysis for the selected preset
pub fn execute_analyze_command(
    args: &AnalyzeArgs,
    config: &Config,
    base_dir: &Path,
) -> Result<ExitCode, MythwrapError> {
    let mut request = AnalysisRequest::from_config(config, args.preset.as_deref(), base_dir)?;
    request.targets.clone_from(&args.targets);
    request.extra_args.clone_from(&args.extra);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match analysis::run(&request, &mut out) {
        Ok(report) => {
            info!(
                targets = report.outcomes.len(),
                with_issues = report.issue_count(),
                "Analysis run finished"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let MythwrapError::Runner(inner) = &err else {
                return Err(err);
            };
            out.flush()?;
            eprintln!("Error running Mythril analysis: {inner}");
            for hint in err.suggestions() {
                eprintln!("  - {hint}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
