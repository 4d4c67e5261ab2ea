use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use mythwrap_utils::error::ConfigError;
use mythwrap_utils::types::ConfigSource;

use super::model::{PresetSection, TomlConfig};
use super::{AnalyzerSettings, CliArgs, Config, PipelineSettings};
use crate::preset::{Preset, SolcArtifact, builtin_presets};
use crate::solc::DEFAULT_SOLC_CONFIG_PATH;
use crate::target::TargetRule;

/// Directory holding the config file, searched upward from the start dir.
pub const CONFIG_DIR: &str = ".mythwrap";
/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|e| ConfigError::InvalidValue {
            key: "cwd".to_string(),
            value: e.to_string(),
        })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid process-global state.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut source_attribution = HashMap::new();
        for key in ["binary", "mode", "default_preset", "fail_on_issues"] {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        let mut analyzer = AnalyzerSettings::default();
        let mut presets = builtin_presets();
        let mut pipeline = PipelineSettings::default();

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.is_file() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    });
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            debug!(path = %path.display(), "Loading config file");
            let file_config = Self::load_config_file(path)?;

            if let Some(section) = file_config.analyzer {
                if let Some(binary) = section.binary {
                    analyzer.binary = binary;
                    source_attribution.insert("binary".to_string(), ConfigSource::Config);
                }
                if let Some(mode) = section.mode {
                    analyzer.mode_override = Some(mode);
                    source_attribution.insert("mode".to_string(), ConfigSource::Config);
                }
                if let Some(preset) = section.default_preset {
                    analyzer.default_preset = preset;
                    source_attribution.insert("default_preset".to_string(), ConfigSource::Config);
                }
                if let Some(fail) = section.fail_on_issues {
                    analyzer.fail_on_issues = fail;
                    source_attribution.insert("fail_on_issues".to_string(), ConfigSource::Config);
                }
            }

            for (name, section) in file_config.presets {
                let merged = match presets.remove(&name) {
                    Some(base) => apply_preset_section(base, section)?,
                    None => apply_preset_section(empty_preset(&name), section)?,
                };
                presets.insert(name, merged);
            }

            if let Some(file_pipeline) = file_config.pipeline {
                pipeline = file_pipeline;
            }
        }

        // CLI overrides
        if let Some(binary) = &cli_args.analyzer {
            analyzer.binary = binary.clone();
            source_attribution.insert("binary".to_string(), ConfigSource::Cli);
        }
        if let Some(mode) = cli_args.mode {
            analyzer.mode_override = Some(mode);
            source_attribution.insert("mode".to_string(), ConfigSource::Cli);
        }
        if let Some(preset) = &cli_args.preset {
            analyzer.default_preset = preset.clone();
            source_attribution.insert("default_preset".to_string(), ConfigSource::Cli);
        }
        if cli_args.fail_on_issues {
            analyzer.fail_on_issues = true;
            source_attribution.insert("fail_on_issues".to_string(), ConfigSource::Cli);
        }

        if analyzer.binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "analyzer.binary".to_string(),
                value: "must not be empty".to_string(),
            });
        }

        Ok(Config {
            analyzer,
            presets,
            pipeline,
            config_path,
            source_attribution,
        })
    }

    /// Discover config file by searching upward from a given directory
    ///
    /// Walks up the directory tree looking for `.mythwrap/config.toml`, stopping
    /// at repository root markers (.git, .hg, .svn) or filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = start_dir.to_path_buf();

        loop {
            let config_path = current_dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.is_file() {
                return Some(config_path);
            }

            if current_dir.join(".git").exists()
                || current_dir.join(".hg").exists()
                || current_dir.join(".svn").exists()
            {
                return None;
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent.to_path_buf(),
                None => return None,
            }
        }
    }

    /// Load configuration from TOML file
    fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidFile(format!("Failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            ConfigError::InvalidFile(format!("Failed to parse {}: {e}", path.display()))
        })
    }
}

fn empty_preset(name: &str) -> Preset {
    Preset {
        name: name.to_string(),
        description: String::new(),
        mode: Default::default(),
        targets: TargetRule::default(),
        solc: None,
        options: Default::default(),
    }
}

fn apply_preset_section(mut preset: Preset, section: PresetSection) -> Result<Preset, ConfigError> {
    if let Some(description) = section.description {
        preset.description = description;
    }
    if let Some(mode) = section.mode {
        preset.mode = mode;
    }
    if let Some(targets) = section.targets {
        if targets.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: format!("presets.{}.targets", preset.name),
                value: "must list at least one location".to_string(),
            });
        }
        preset.targets = TargetRule {
            candidates: targets,
        };
    }

    match (section.solc, section.solc_path) {
        (Some(config), path) => {
            let path = path
                .or_else(|| preset.solc.as_ref().map(|a| a.path.clone()))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOLC_CONFIG_PATH));
            preset.solc = Some(SolcArtifact { path, config });
        }
        (None, Some(path)) => match preset.solc.as_mut() {
            Some(artifact) => artifact.path = path,
            None => {
                return Err(ConfigError::InvalidValue {
                    key: format!("presets.{}.solc_path", preset.name),
                    value: "set without a [solc] table".to_string(),
                });
            }
        },
        (None, None) => {}
    }

    preset.options.merge(&section.options);
    Ok(preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mythwrap_runner::RunMode;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        let path = config_dir.join(CONFIG_FILE);
        fs::write(&path, body).unwrap();
        path
    }

    fn isolated_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        // Stop upward discovery from escaping the temp dir
        fs::create_dir(dir.path().join(".git")).unwrap();
        dir
    }

    #[test]
    fn test_defaults_without_config_file() {
        let dir = isolated_dir();
        let config = Config::discover_from(dir.path(), &CliArgs::default()).unwrap();

        assert!(config.config_path.is_none());
        assert_eq!(config.analyzer.binary, "myth");
        assert_eq!(config.analyzer.default_preset, "instrumented");
        assert!(!config.analyzer.fail_on_issues);
        assert_eq!(config.source_of("binary"), ConfigSource::Default);
        assert_eq!(config.preset_names(), vec!["deep", "instrumented", "quick"]);
    }

    #[test]
    fn test_config_file_found_from_subdirectory() {
        let dir = isolated_dir();
        let path = write_config(dir.path(), "[analyzer]\nbinary = \"/opt/myth\"\n");
        let nested = dir.path().join("contracts").join("sub");
        fs::create_dir_all(&nested).unwrap();

        let config = Config::discover_from(&nested, &CliArgs::default()).unwrap();
        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.analyzer.binary, "/opt/myth");
        assert_eq!(config.source_of("binary"), ConfigSource::Config);
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = isolated_dir();
        write_config(
            dir.path(),
            "[analyzer]\nbinary = \"from-file\"\nmode = \"capture\"\n",
        );
        let cli = CliArgs {
            analyzer: Some("from-cli".to_string()),
            mode: Some(RunMode::Stream),
            fail_on_issues: true,
            ..Default::default()
        };

        let config = Config::discover_from(dir.path(), &cli).unwrap();
        assert_eq!(config.analyzer.binary, "from-cli");
        assert_eq!(config.analyzer.mode_override, Some(RunMode::Stream));
        assert!(config.analyzer.fail_on_issues);
        assert_eq!(config.source_of("binary"), ConfigSource::Cli);
        assert_eq!(config.source_of("mode"), ConfigSource::Cli);
    }

    #[test]
    fn test_file_preset_overrides_builtin_fields() {
        let dir = isolated_dir();
        write_config(
            dir.path(),
            r#"
[presets.instrumented]
max_depth = 5
mode = "stream"
"#,
        );

        let config = Config::discover_from(dir.path(), &CliArgs::default()).unwrap();
        let preset = config.resolve_preset(None).unwrap();
        assert_eq!(preset.mode, RunMode::Stream);
        assert_eq!(preset.options.max_depth, Some(5));
        // untouched fields keep built-in values
        assert_eq!(preset.options.execution_timeout, Some(60));
        assert_eq!(preset.targets, TargetRule::default());
    }

    #[test]
    fn test_file_defines_new_preset() {
        let dir = isolated_dir();
        write_config(
            dir.path(),
            r#"
[presets.mine]
description = "custom"
targets = [{ dir = "src", pattern = "*.sol" }]
modules = ["ether_thief", "suicide"]
extra_args = ["--no-onchain-data"]

[presets.mine.solc]
remappings = ["a=b"]
optimizer = { enabled = true, runs = 1000 }
"#,
        );

        let config = Config::discover_from(dir.path(), &CliArgs::default()).unwrap();
        let preset = config.resolve_preset(Some("mine")).unwrap();
        assert_eq!(preset.description, "custom");
        assert_eq!(preset.targets.candidates[0].dir, PathBuf::from("src"));
        assert_eq!(
            preset.options.modules,
            Some(vec!["ether_thief".to_string(), "suicide".to_string()])
        );
        let artifact = preset.solc.unwrap();
        assert_eq!(artifact.path, PathBuf::from(DEFAULT_SOLC_CONFIG_PATH));
        assert_eq!(artifact.config.optimizer.runs, 1000);
        assert_eq!(artifact.config.remappings, vec!["a=b"]);
    }

    #[test]
    fn test_solc_path_without_solc_table_is_rejected() {
        let dir = isolated_dir();
        write_config(
            dir.path(),
            "[presets.instrumented]\nsolc_path = \"x/solc.json\"\n",
        );
        let err = Config::discover_from(dir.path(), &CliArgs::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_invalid_toml_is_invalid_file() {
        let dir = isolated_dir();
        write_config(dir.path(), "[analyzer\nbinary = ");
        let err = Config::discover_from(dir.path(), &CliArgs::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFile(_)));
    }

    #[test]
    fn test_explicit_missing_config_is_not_found() {
        let dir = isolated_dir();
        let cli = CliArgs {
            config_path: Some(dir.path().join("nope.toml")),
            ..Default::default()
        };
        let err = Config::discover_from(dir.path(), &cli).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_unknown_preset_lists_available() {
        let dir = isolated_dir();
        let config = Config::discover_from(dir.path(), &CliArgs::default()).unwrap();
        match config.resolve_preset(Some("nope")) {
            Err(ConfigError::UnknownPreset { name, available }) => {
                assert_eq!(name, "nope");
                assert_eq!(available, vec!["deep", "instrumented", "quick"]);
            }
            other => panic!("Expected UnknownPreset, got {other:?}"),
        }
    }

    #[test]
    fn test_mode_override_applies_to_resolved_preset() {
        let dir = isolated_dir();
        let cli = CliArgs {
            mode: Some(RunMode::Stream),
            ..Default::default()
        };
        let config = Config::discover_from(dir.path(), &cli).unwrap();
        let preset = config.resolve_preset(None).unwrap();
        assert_eq!(preset.mode, RunMode::Stream);
        assert_eq!(config.effective_mode(&preset), RunMode::Stream);
    }

    #[test]
    fn test_pipeline_section_replaces_defaults() {
        let dir = isolated_dir();
        write_config(
            dir.path(),
            "[pipeline]\ncontract = \"contracts/SimpleDAO.sol\"\n",
        );
        let config = Config::discover_from(dir.path(), &CliArgs::default()).unwrap();
        assert_eq!(config.pipeline.contract, PathBuf::from("contracts/SimpleDAO.sol"));
        assert_eq!(config.pipeline.npx, "npx");
    }
}
