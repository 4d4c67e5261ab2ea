//! Layered configuration: CLI flags > `.mythwrap/config.toml` > built-in defaults

mod discovery;
mod model;

pub use discovery::{CONFIG_DIR, CONFIG_FILE};
pub use model::{
    AnalyzerSection, AnalyzerSettings, CliArgs, DEFAULT_ANALYZER, PipelineSettings, PresetSection,
};

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use mythwrap_runner::RunMode;
use mythwrap_utils::error::ConfigError;
use mythwrap_utils::types::ConfigSource;

use crate::preset::Preset;

/// Effective configuration for one mythwrap invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub analyzer: AnalyzerSettings,
    pub presets: BTreeMap<String, Preset>,
    pub pipeline: PipelineSettings,
    /// Config file that was loaded, if any
    pub config_path: Option<PathBuf>,
    /// Which layer each top-level analyzer setting came from
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Config {
    /// Names of all known presets, sorted.
    #[must_use]
    pub fn preset_names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    /// Look up a preset by name, or the default preset when `name` is `None`.
    ///
    /// The analyzer-wide mode override, if any, is applied to the returned copy.
    pub fn resolve_preset(&self, name: Option<&str>) -> Result<Preset, ConfigError> {
        let name = name.unwrap_or(&self.analyzer.default_preset);
        let mut preset =
            self.presets
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownPreset {
                    name: name.to_string(),
                    available: self.preset_names(),
                })?;
        if let Some(mode) = self.analyzer.mode_override {
            preset.mode = mode;
        }
        Ok(preset)
    }

    /// Effective run mode for a preset after the override.
    #[must_use]
    pub fn effective_mode(&self, preset: &Preset) -> RunMode {
        self.analyzer.mode_override.unwrap_or(preset.mode)
    }

    /// Analyzer program to spawn for a project rooted at `base_dir`.
    ///
    /// A bare name is left for PATH lookup; a relative path with a directory
    /// part is anchored at `base_dir` so it does not depend on the process cwd.
    #[must_use]
    pub fn analyzer_program(&self, base_dir: &Path) -> PathBuf {
        let binary = Path::new(&self.analyzer.binary);
        if binary.is_relative() && binary.components().count() > 1 {
            base_dir.join(binary)
        } else {
            binary.to_path_buf()
        }
    }

    /// Source of a top-level setting, `Default` when untracked.
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .copied()
            .unwrap_or(ConfigSource::Default)
    }
}
