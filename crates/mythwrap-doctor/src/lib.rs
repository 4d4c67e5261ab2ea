//! Doctor command for environment health checks
//!
//! Preflight checks for analyzer availability, target directories,
//! config-artifact writability, and configuration discovery.

pub use mythwrap_utils::types::{CheckStatus, DoctorCheck, DoctorOutput};

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::debug;

use mythwrap_config::{Config, DEFAULT_SOLC_CONFIG_PATH};
use mythwrap_runner::{CommandSpec, NativeRunner, ProcessRunner};

/// Doctor command implementation
pub struct DoctorCommand {
    config: Config,
    base_dir: PathBuf,
}

impl DoctorCommand {
    /// Create a doctor for the project rooted at `base_dir`.
    #[must_use]
    pub fn new(config: Config, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            base_dir: base_dir.into(),
        }
    }

    /// Run all health checks and return the doctor output
    #[must_use]
    pub fn run(&self) -> DoctorOutput {
        let mut checks = vec![
            self.check_analyzer_path(),
            self.check_analyzer_version(),
            self.check_config_file(),
            self.check_artifact_dir_writable(),
        ];
        checks.extend(self.check_target_dirs());
        checks.sort_by(|a, b| a.name.cmp(&b.name));

        let ok = !checks.iter().any(|c| c.status == CheckStatus::Fail);

        DoctorOutput {
            schema_version: "1".to_string(),
            emitted_at: Utc::now(),
            ok,
            checks,
        }
    }

    /// Check that the analyzer resolves to an executable
    fn check_analyzer_path(&self) -> DoctorCheck {
        let binary = &self.config.analyzer.binary;
        let program = self.config.analyzer_program(&self.base_dir);
        let resolved = if program.components().count() > 1 {
            program.is_file().then_some(program)
        } else {
            which::which(&program).ok()
        };

        match resolved {
            Some(path) => DoctorCheck {
                name: "analyzer_path".to_string(),
                status: CheckStatus::Pass,
                details: format!("Found {binary} at {}", path.display()),
            },
            None => DoctorCheck {
                name: "analyzer_path".to_string(),
                status: CheckStatus::Fail,
                details: format!("Analyzer '{binary}' not found in PATH"),
            },
        }
    }

    /// Check that the analyzer answers `version`
    fn check_analyzer_version(&self) -> DoctorCheck {
        let cmd = CommandSpec::new(self.config.analyzer_program(&self.base_dir))
            .arg("version")
            .cwd(&self.base_dir);

        match NativeRunner::new().run(&cmd) {
            Ok(output) if output.success() => DoctorCheck {
                name: "analyzer_version".to_string(),
                status: CheckStatus::Pass,
                details: output.stdout_string().trim().to_string(),
            },
            Ok(output) => DoctorCheck {
                name: "analyzer_version".to_string(),
                status: CheckStatus::Warn,
                details: format!(
                    "'{} version' exited with {:?}: {}",
                    self.config.analyzer.binary,
                    output.exit_code,
                    output.stderr_string().trim()
                ),
            },
            Err(e) => DoctorCheck {
                name: "analyzer_version".to_string(),
                status: CheckStatus::Fail,
                details: e.to_string(),
            },
        }
    }

    /// Report which config file is in effect
    fn check_config_file(&self) -> DoctorCheck {
        let details = match &self.config.config_path {
            Some(path) => format!("Using {}", path.display()),
            None => "No config file found, using built-in defaults".to_string(),
        };
        DoctorCheck {
            name: "config_file".to_string(),
            status: CheckStatus::Pass,
            details,
        }
    }

    /// One check per target directory of the default preset
    fn check_target_dirs(&self) -> Vec<DoctorCheck> {
        let preset = match self.config.resolve_preset(None) {
            Ok(preset) => preset,
            Err(e) => {
                return vec![DoctorCheck {
                    name: "default_preset".to_string(),
                    status: CheckStatus::Fail,
                    details: e.to_string(),
                }];
            }
        };

        preset
            .targets
            .candidates
            .iter()
            .map(|candidate| {
                let dir = self.base_dir.join(&candidate.dir);
                let name = format!("target_dir:{}", candidate.dir.display());
                if dir.is_dir() {
                    DoctorCheck {
                        name,
                        status: CheckStatus::Pass,
                        details: format!("{} exists", candidate.describe()),
                    }
                } else {
                    DoctorCheck {
                        name,
                        status: CheckStatus::Warn,
                        details: format!("{} does not exist", candidate.dir.display()),
                    }
                }
            })
            .collect()
    }

    /// Check that the config artifact directory can be written
    fn check_artifact_dir_writable(&self) -> DoctorCheck {
        let artifact = PathBuf::from(DEFAULT_SOLC_CONFIG_PATH);
        let dir = self
            .base_dir
            .join(artifact.parent().unwrap_or_else(|| Path::new(".")));

        // Probe in the nearest existing ancestor so doctor never creates directories
        let mut probe_dir = dir.as_path();
        while !probe_dir.exists() {
            match probe_dir.parent() {
                Some(parent) => probe_dir = parent,
                None => break,
            }
        }
        debug!(dir = %probe_dir.display(), "Probing write access");

        match tempfile::NamedTempFile::new_in(probe_dir) {
            Ok(_) => DoctorCheck {
                name: "artifact_dir_writable".to_string(),
                status: CheckStatus::Pass,
                details: format!("{} is writable", dir.display()),
            },
            Err(e) => DoctorCheck {
                name: "artifact_dir_writable".to_string(),
                status: CheckStatus::Fail,
                details: format!("Cannot write under {}: {e}", probe_dir.display()),
            },
        }
    }
}
