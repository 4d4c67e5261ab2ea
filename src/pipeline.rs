//! Instrument-then-test pipeline
//!
//! Prepares the project layout, instruments the contract with Scribble and
//! runs the Hardhat test suite. Both tools run through `npx` with inherited
//! stdio so their output reaches the terminal unchanged.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use mythwrap_config::PipelineSettings;
use mythwrap_runner::{CommandSpec, InheritRunner};
use mythwrap_utils::MythwrapError;

pub const SCRIBBLE_STEP: &str = "Scribble instrumentation";
pub const HARDHAT_STEP: &str = "Hardhat tests";

/// One pipeline run over a project directory.
pub struct Pipeline<'a> {
    settings: &'a PipelineSettings,
    base_dir: &'a Path,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(settings: &'a PipelineSettings, base_dir: &'a Path) -> Self {
        Self { settings, base_dir }
    }

    /// Directories the pipeline expects, relative to the project root.
    #[must_use]
    pub fn required_dirs(&self) -> Vec<PathBuf> {
        let s = self.settings;
        let mut dirs: Vec<PathBuf> = [
            parent_of(&s.scribble_config),
            parent_of(&s.contract),
            Some(s.instrumented_dir.clone()),
            parent_of(&s.test_file),
        ]
        .into_iter()
        .flatten()
        .collect();
        dirs.dedup();
        dirs
    }

    /// Create any missing directory, reporting each one created.
    pub fn ensure_directories(&self, out: &mut dyn Write) -> Result<Vec<PathBuf>, MythwrapError> {
        let mut created = Vec::new();
        for dir in self.required_dirs() {
            let full = self.base_dir.join(&dir);
            if full.is_dir() {
                continue;
            }
            fs::create_dir_all(&full)?;
            writeln!(out, "Created directory: {}", dir.display())?;
            created.push(dir);
        }
        Ok(created)
    }

    /// A relative `npx` path with a directory part is anchored at the project root.
    fn npx_program(&self) -> PathBuf {
        let npx = Path::new(&self.settings.npx);
        if npx.is_relative() && npx.components().count() > 1 {
            self.base_dir.join(npx)
        } else {
            npx.to_path_buf()
        }
    }

    /// `npx scribble --output-mode files --utils-output-path <dir> <contract>`
    #[must_use]
    pub fn scribble_command(&self) -> CommandSpec {
        CommandSpec::new(self.npx_program())
            .args(["scribble", "--output-mode", "files", "--utils-output-path"])
            .arg(self.settings.instrumented_dir.as_os_str())
            .arg(self.settings.contract.as_os_str())
            .cwd(self.base_dir)
    }

    /// `npx hardhat test`
    #[must_use]
    pub fn hardhat_command(&self) -> CommandSpec {
        CommandSpec::new(self.npx_program())
            .args(["hardhat", "test"])
            .cwd(self.base_dir)
    }

    /// Run every step in order, stopping at the first failure.
    pub fn run(&self, out: &mut dyn Write) -> Result<(), MythwrapError> {
        self.ensure_directories(out)?;

        let runner = InheritRunner::new();
        for (step, cmd) in [
            (SCRIBBLE_STEP, self.scribble_command()),
            (HARDHAT_STEP, self.hardhat_command()),
        ] {
            writeln!(out, "Running {step}...")?;
            out.flush()?;
            debug!(argv = ?cmd.argv(), "Starting pipeline step");

            let exit_code = runner.run(&cmd).map_err(|e| MythwrapError::StepFailed {
                step: step.to_string(),
                detail: e.to_string(),
            })?;
            match exit_code {
                Some(0) => {
                    info!(step, "Pipeline step finished");
                    writeln!(out, "{step} completed successfully.")?;
                }
                Some(code) => {
                    return Err(MythwrapError::StepFailed {
                        step: step.to_string(),
                        detail: format!("exited with code {code}"),
                    });
                }
                None => {
                    return Err(MythwrapError::StepFailed {
                        step: step.to_string(),
                        detail: "terminated by signal".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn parent_of(path: &Path) -> Option<PathBuf> {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_required_dirs_follow_settings() {
        let settings = PipelineSettings::default();
        let dir = TempDir::new().unwrap();
        let dirs = Pipeline::new(&settings, dir.path()).required_dirs();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("config"),
                PathBuf::from("contracts"),
                PathBuf::from("instrumented"),
                PathBuf::from("test"),
            ]
        );
    }

    #[test]
    fn test_ensure_directories_reports_only_new_ones() {
        let settings = PipelineSettings::default();
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("contracts")).unwrap();

        let pipeline = Pipeline::new(&settings, dir.path());
        let mut out = Vec::new();
        let created = pipeline.ensure_directories(&mut out).unwrap();
        assert_eq!(created.len(), 3);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Created directory: config"));
        assert!(!text.contains("Created directory: contracts"));

        let mut again = Vec::new();
        assert!(pipeline.ensure_directories(&mut again).unwrap().is_empty());
        assert!(again.is_empty());
    }

    #[test]
    fn test_scribble_command_argv() {
        let settings = PipelineSettings::default();
        let dir = TempDir::new().unwrap();
        let argv = Pipeline::new(&settings, dir.path()).scribble_command().argv();
        assert_eq!(
            argv,
            vec![
                "npx",
                "scribble",
                "--output-mode",
                "files",
                "--utils-output-path",
                "instrumented",
                "contracts/GovernorBravoDelegate.sol",
            ]
        );
    }

    #[test]
    fn test_missing_npx_fails_first_step() {
        let settings = PipelineSettings {
            npx: "this_command_definitely_does_not_exist_12345".to_string(),
            ..Default::default()
        };
        let dir = TempDir::new().unwrap();

        let err = Pipeline::new(&settings, dir.path())
            .run(&mut Vec::new())
            .unwrap_err();
        match err {
            MythwrapError::StepFailed { step, .. } => assert_eq!(step, SCRIBBLE_STEP),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    fn npx_stub(dir: &Path, body: &str) -> PipelineSettings {
        use std::os::unix::fs::PermissionsExt;

        let stub = dir.join("npx-stub");
        fs::write(&stub, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();
        PipelineSettings {
            npx: stub.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_steps_are_reported() {
        let dir = TempDir::new().unwrap();
        let settings = npx_stub(dir.path(), "exit 0");

        let mut out = Vec::new();
        Pipeline::new(&settings, dir.path()).run(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(
            "Running Scribble instrumentation...\nScribble instrumentation completed successfully.\n"
        ));
        assert!(text.ends_with("Running Hardhat tests...\nHardhat tests completed successfully.\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_stops_pipeline() {
        let dir = TempDir::new().unwrap();
        // scribble succeeds, hardhat fails
        let settings = npx_stub(dir.path(), "[ \"$1\" = scribble ] && exit 0\nexit 4");

        let mut out = Vec::new();
        let err = Pipeline::new(&settings, dir.path())
            .run(&mut out)
            .unwrap_err();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Scribble instrumentation completed successfully."));
        assert!(!text.contains("Hardhat tests completed successfully."));
        match err {
            MythwrapError::StepFailed { step, detail } => {
                assert_eq!(step, HARDHAT_STEP);
                assert!(detail.contains('4'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
