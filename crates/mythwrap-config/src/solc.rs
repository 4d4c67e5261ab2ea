//! Compiler settings file handed to the analyzer via `--solc-json`

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use mythwrap_utils::atomic_write::write_file_atomic;

/// Default location of the config artifact, relative to the project root.
pub const DEFAULT_SOLC_CONFIG_PATH: &str = "config/solc.json";

/// Optimizer section of the solc settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optimizer {
    pub enabled: bool,
    pub runs: u32,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self {
            enabled: false,
            runs: 200,
        }
    }
}

/// Solc settings serialized as
/// `{"remappings": [...], "optimizer": {"enabled": .., "runs": ..}, "version"?: ".."}`.
///
/// Written fresh before each run and never read back by mythwrap.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SolcConfig {
    #[serde(default)]
    pub remappings: Vec<String>,
    #[serde(default)]
    pub optimizer: Optimizer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl SolcConfig {
    /// Pretty JSON with a trailing newline. Field order is fixed, so equal
    /// configs always produce identical bytes.
    pub fn to_json(&self) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(self).context("Failed to serialize solc config")?;
        json.push('\n');
        Ok(json)
    }

    /// Write this config to `path`, creating the parent directory if absent
    /// and replacing any existing file. Returns the path written.
    pub fn write_to(&self, path: &Path) -> Result<PathBuf> {
        let utf8 = Utf8PathBuf::from_path_buf(path.to_path_buf())
            .map_err(|p| anyhow::anyhow!("Config path is not valid UTF-8: {}", p.display()))?;
        let json = self.to_json()?;
        let outcome = write_file_atomic(&utf8, &json)?;
        debug!(
            path = %utf8,
            created_parent = outcome.created_parent,
            "Wrote solc config"
        );
        Ok(path.to_path_buf())
    }
}
