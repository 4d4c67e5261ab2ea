//! Analysis driver
//!
//! Resolves the targets of a preset, writes its compiler config artifact and
//! runs the analyzer once per target, relaying output in capture or stream
//! mode. All console output goes through a caller-supplied writer so the
//! exact text can be asserted in tests.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use mythwrap_config::{Config, Preset, target};
use mythwrap_runner::{CommandSpec, NativeRunner, ProcessRunner, RunMode, StreamingRunner};
use mythwrap_utils::MythwrapError;
use mythwrap_utils::logging::{analysis_span, log_analysis_complete};

/// Everything needed to analyze a set of targets with one preset.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub preset: Preset,
    /// Analyzer program, already resolved against `base_dir`
    pub program: PathBuf,
    /// Project root; targets and the config artifact are relative to it
    pub base_dir: PathBuf,
    /// Explicit targets. Empty means "locate by convention".
    pub targets: Vec<PathBuf>,
    /// Passed through to the analyzer after the preset flags
    pub extra_args: Vec<String>,
    pub fail_on_issues: bool,
}

impl AnalysisRequest {
    /// Build a request for `preset_name` (or the default preset).
    pub fn from_config(
        config: &Config,
        preset_name: Option<&str>,
        base_dir: &Path,
    ) -> Result<Self, MythwrapError> {
        let preset = config.resolve_preset(preset_name)?;
        Ok(Self {
            preset,
            program: config.analyzer_program(base_dir),
            base_dir: base_dir.to_path_buf(),
            targets: Vec::new(),
            extra_args: Vec::new(),
            fail_on_issues: config.analyzer.fail_on_issues,
        })
    }

    /// Explicit targets when given, otherwise the preset's conventional locations.
    pub fn resolve_targets(&self) -> Result<Vec<PathBuf>, MythwrapError> {
        if self.targets.is_empty() {
            self.preset.targets.locate(&self.base_dir)
        } else {
            target::verify_explicit(&self.targets, &self.base_dir)
        }
    }

    /// Full invocation for one target.
    #[must_use]
    pub fn command_for(&self, target: &Path) -> CommandSpec {
        self.preset
            .command_for(&self.program.to_string_lossy(), target)
            .args(&self.extra_args)
            .cwd(&self.base_dir)
    }
}

/// Result of one analyzer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: PathBuf,
    pub exit_code: Option<i32>,
}

impl TargetOutcome {
    #[must_use]
    pub fn classification(&self) -> Classification {
        match self.exit_code {
            Some(0) => Classification::Success,
            _ => Classification::IssuesFound,
        }
    }

    #[must_use]
    pub fn issues_found(&self) -> bool {
        self.classification() == Classification::IssuesFound
    }
}

/// How one analyzer exit is read. Signal death counts as issues found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Success,
    IssuesFound,
}

/// Outcomes for every target, in analysis order.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl AnalysisReport {
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.issues_found()).count()
    }
}

/// Write the preset's compiler config artifact, if it has one.
///
/// Happens once per run, before any analyzer is spawned.
pub fn write_config(preset: &Preset, base_dir: &Path) -> Result<Option<PathBuf>, MythwrapError> {
    let Some(artifact) = &preset.solc else {
        return Ok(None);
    };
    let path = base_dir.join(&artifact.path);
    artifact
        .config
        .write_to(&path)
        .map_err(|e| MythwrapError::ArtifactWrite {
            path: artifact.path.clone(),
            reason: format!("{e:#}"),
        })?;
    debug!(path = %path.display(), "Wrote compiler config");
    Ok(Some(path))
}

/// Run the analyzer on every target of the request.
///
/// A failure to start the analyzer stops the run immediately; the remaining
/// targets are not attempted. Issues reported by the analyzer are not errors
/// unless `fail_on_issues` is set, in which case they become
/// [`MythwrapError::IssuesFound`] once every target has run.
pub fn run(request: &AnalysisRequest, out: &mut dyn Write) -> Result<AnalysisReport, MythwrapError> {
    let targets = request.resolve_targets()?;
    write_config(&request.preset, &request.base_dir)?;

    let mode = request.preset.mode;
    info!(
        preset = %request.preset.name,
        mode = %mode,
        targets = targets.len(),
        "Starting analysis"
    );

    let mut report = AnalysisReport::default();
    for target in &targets {
        writeln!(out, "\nAnalyzing {}...", target.display())?;
        let cmd = request.command_for(target);
        let exit_code = run_analysis(&cmd, &request.preset.name, target, mode, out)?;
        report.outcomes.push(TargetOutcome {
            target: target.clone(),
            exit_code,
        });
    }

    let issues = report.issue_count();
    if request.fail_on_issues && issues > 0 {
        return Err(MythwrapError::IssuesFound { count: issues });
    }
    Ok(report)
}

/// Run one prepared analyzer invocation and relay its output.
///
/// Returns the analyzer's exit code (`None` when killed by a signal).
pub fn run_analysis(
    cmd: &CommandSpec,
    preset: &str,
    target: &Path,
    mode: RunMode,
    out: &mut dyn Write,
) -> Result<Option<i32>, MythwrapError> {
    let target_display = target.display().to_string();
    let span = analysis_span(preset, &target_display, mode.as_str());
    let _guard = span.enter();
    debug!(argv = ?cmd.argv(), "Spawning analyzer");

    writeln!(out, "Running Mythril analysis on {target_display}...")?;
    out.flush()?;

    let started = Instant::now();
    let exit_code = match mode {
        RunMode::Capture => relay_captured(cmd, out)?,
        RunMode::Stream => relay_streamed(cmd, out)?,
    };
    log_analysis_complete(&target_display, exit_code, started.elapsed());
    Ok(exit_code)
}

fn relay_captured(cmd: &CommandSpec, out: &mut dyn Write) -> Result<Option<i32>, MythwrapError> {
    let output = NativeRunner::new().run(cmd)?;

    if output.success() {
        writeln!(out, "Analysis completed successfully!")?;
    } else {
        writeln!(out, "Analysis found potential issues:")?;
    }
    write_block(out, &output.stdout_string())?;

    if !output.success() {
        writeln!(out, "Errors/Warnings:")?;
        write_block(out, &output.stderr_string())?;
    }
    out.flush()?;
    Ok(output.exit_code)
}

fn relay_streamed(cmd: &CommandSpec, out: &mut dyn Write) -> Result<Option<i32>, MythwrapError> {
    let outcome = StreamingRunner::new().run(cmd, |line| {
        writeln!(out, "{line}")?;
        out.flush()
    })?;

    if outcome.success() {
        writeln!(out, "Analysis completed successfully!")?;
    } else {
        writeln!(out, "Analysis found potential issues:")?;
    }

    let stderr = outcome.stderr_string();
    if !stderr.is_empty() {
        writeln!(out, "Errors/Warnings:")?;
        write_block(out, &stderr)?;
    }
    out.flush()?;
    Ok(outcome.exit_code)
}

/// Write `text` and make sure it ends on a fresh line.
fn write_block(out: &mut dyn Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}
