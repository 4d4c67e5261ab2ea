use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use mythwrap_runner::RunMode;

use crate::options::AnalyzerOptions;
use crate::preset::DEFAULT_PRESET;
use crate::solc::SolcConfig;
use crate::target::TargetCandidate;

/// Analyzer program used when nothing else is configured.
pub const DEFAULT_ANALYZER: &str = "myth";

/// `[analyzer]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalyzerSection {
    pub binary: Option<String>,
    pub mode: Option<RunMode>,
    pub default_preset: Option<String>,
    pub fail_on_issues: Option<bool>,
}

/// `[presets.<name>]` table. Every field is optional so a file can tweak a
/// built-in preset without restating it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PresetSection {
    pub description: Option<String>,
    pub mode: Option<RunMode>,
    pub targets: Option<Vec<TargetCandidate>>,
    pub solc: Option<SolcConfig>,
    pub solc_path: Option<PathBuf>,
    #[serde(flatten)]
    pub options: AnalyzerOptions,
}

/// `[pipeline]` section and its effective values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Runner for the JS tooling
    pub npx: String,
    pub contract: PathBuf,
    pub instrumented_dir: PathBuf,
    pub scribble_config: PathBuf,
    pub test_file: PathBuf,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            npx: "npx".to_string(),
            contract: PathBuf::from("contracts/GovernorBravoDelegate.sol"),
            instrumented_dir: PathBuf::from("instrumented"),
            scribble_config: PathBuf::from("config/scribble.json"),
            test_file: PathBuf::from("test/GovernorBravoDelegate.test.js"),
        }
    }
}

/// Effective analyzer settings after layering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerSettings {
    pub binary: String,
    /// Forces every preset into this mode when set
    pub mode_override: Option<RunMode>,
    pub default_preset: String,
    pub fail_on_issues: bool,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            binary: DEFAULT_ANALYZER.to_string(),
            mode_override: None,
            default_preset: DEFAULT_PRESET.to_string(),
            fail_on_issues: false,
        }
    }
}

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct TomlConfig {
    pub analyzer: Option<AnalyzerSection>,
    #[serde(default)]
    pub presets: BTreeMap<String, PresetSection>,
    pub pipeline: Option<PipelineSettings>,
}

/// Values supplied on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub analyzer: Option<String>,
    pub mode: Option<RunMode>,
    pub preset: Option<String>,
    pub fail_on_issues: bool,
}
