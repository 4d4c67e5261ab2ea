//! Analysis presets
//!
//! A preset bundles everything one run needs: where to find targets, the
//! optional solc settings file, the analyzer flags, and how output is
//! relayed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mythwrap_runner::{CommandSpec, RunMode};

use crate::options::AnalyzerOptions;
use crate::solc::{DEFAULT_SOLC_CONFIG_PATH, Optimizer, SolcConfig};
use crate::target::TargetRule;

/// Name of the preset used when none is selected.
pub const DEFAULT_PRESET: &str = "instrumented";

/// Subcommand passed to the analyzer before the target path.
pub const ANALYZE_SUBCOMMAND: &str = "analyze";

/// Solc settings file to write before invoking the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolcArtifact {
    pub path: PathBuf,
    pub config: SolcConfig,
}

/// One analysis preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub mode: RunMode,
    pub targets: TargetRule,
    pub solc: Option<SolcArtifact>,
    pub options: AnalyzerOptions,
}

impl Preset {
    /// Build the analyzer invocation for one target.
    ///
    /// Order: `<program> analyze <target> <flags...> [--solc-json <path>]`.
    #[must_use]
    pub fn command_for(&self, program: &str, target: &Path) -> CommandSpec {
        let mut cmd = CommandSpec::new(program)
            .arg(ANALYZE_SUBCOMMAND)
            .arg(target.as_os_str())
            .args(self.options.to_args());

        if let Some(ref artifact) = self.solc {
            cmd = cmd.arg("--solc-json").arg(artifact.path.as_os_str());
        }
        cmd
    }
}

/// The built-in presets, keyed by name.
#[must_use]
pub fn builtin_presets() -> BTreeMap<String, Preset> {
    [instrumented(), quick(), deep()]
        .into_iter()
        .map(|p| (p.name.clone(), p))
        .collect()
}

fn instrumented() -> Preset {
    Preset {
        name: DEFAULT_PRESET.to_string(),
        description: "Scribble-instrumented contracts, bounded symbolic execution".to_string(),
        mode: RunMode::Capture,
        targets: TargetRule::default(),
        solc: None,
        options: AnalyzerOptions {
            execution_timeout: Some(60),
            max_depth: Some(3),
            solver_timeout: Some(60000),
            pruning_factor: Some(0.8),
            ..Default::default()
        },
    }
}

fn quick() -> Preset {
    Preset {
        name: "quick".to_string(),
        description: "Fast single-transaction sweep of plain contract sources".to_string(),
        mode: RunMode::Stream,
        targets: TargetRule::contracts(),
        solc: Some(SolcArtifact {
            path: PathBuf::from(DEFAULT_SOLC_CONFIG_PATH),
            config: SolcConfig {
                remappings: Vec::new(),
                optimizer: Optimizer {
                    enabled: false,
                    runs: 200,
                },
                version: None,
            },
        }),
        options: AnalyzerOptions {
            execution_timeout: Some(30),
            max_depth: Some(2),
            transaction_count: Some(1),
            strategy: Some("bfs".to_string()),
            ..Default::default()
        },
    }
}

fn deep() -> Preset {
    Preset {
        name: "deep".to_string(),
        description: "Multi-transaction depth-first search with pinned compiler".to_string(),
        mode: RunMode::Stream,
        targets: TargetRule::contracts(),
        solc: Some(SolcArtifact {
            path: PathBuf::from(DEFAULT_SOLC_CONFIG_PATH),
            config: SolcConfig {
                remappings: Vec::new(),
                optimizer: Optimizer {
                    enabled: true,
                    runs: 200,
                },
                version: Some("0.8.19".to_string()),
            },
        }),
        options: AnalyzerOptions {
            execution_timeout: Some(600),
            max_depth: Some(12),
            solver_timeout: Some(100000),
            transaction_count: Some(3),
            strategy: Some("dfs".to_string()),
            solidity_version: Some("0.8.19".to_string()),
            ..Default::default()
        },
    }
}
