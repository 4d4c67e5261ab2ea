//! Presets, target resolution, config artifacts and configuration discovery

pub mod config;
pub mod options;
pub mod preset;
pub mod solc;
pub mod target;

pub use config::{AnalyzerSettings, CliArgs, Config, PipelineSettings};
pub use options::AnalyzerOptions;
pub use preset::{DEFAULT_PRESET, Preset, SolcArtifact, builtin_presets};
pub use solc::{DEFAULT_SOLC_CONFIG_PATH, Optimizer, SolcConfig};
pub use target::{TargetCandidate, TargetRule};
