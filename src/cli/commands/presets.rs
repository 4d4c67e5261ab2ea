//! Presets command implementation
//!
//! Handles `mythwrap presets`, listing each preset with the exact analyzer
//! invocation it produces for a placeholder target.

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::{Config, ExitCode, MythwrapError};

const PLACEHOLDER_TARGET: &str = "<target>";

#[derive(Debug, Serialize)]
struct PresetListing {
    name: String,
    description: String,
    mode: String,
    default: bool,
    targets: Vec<String>,
    solc_json: Option<String>,
    argv: Vec<String>,
}

fn listings(config: &Config) -> Result<Vec<PresetListing>, MythwrapError> {
    config
        .preset_names()
        .iter()
        .map(|name| {
            let preset = config.resolve_preset(Some(name))?;
            let argv = preset
                .command_for(&config.analyzer.binary, Path::new(PLACEHOLDER_TARGET))
                .argv();
            Ok(PresetListing {
                default: *name == config.analyzer.default_preset,
                name: preset.name,
                description: preset.description,
                mode: preset.mode.to_string(),
                targets: preset.targets.candidates.iter().map(|c| c.describe()).collect(),
                solc_json: preset.solc.map(|a| a.path.display().to_string()),
                argv,
            })
        })
        .collect()
}

/// Execute the presets listing command
pub fn execute_presets_command(json: bool, config: &Config) -> Result<ExitCode, MythwrapError> {
    let presets = listings(config)?;

    if json {
        let json_output = serde_json::to_string_pretty(&presets).map_err(io::Error::other)?;
        println!("{json_output}");
        return Ok(ExitCode::SUCCESS);
    }

    for preset in &presets {
        let marker = if preset.default { " (default)" } else { "" };
        println!("{}{marker} [{}]", preset.name, preset.mode);
        if !preset.description.is_empty() {
            println!("  {}", preset.description);
        }
        println!("  targets: {}", preset.targets.join(", "));
        println!("  argv:    {}", preset.argv.join(" "));
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mythwrap_config::CliArgs;
    use tempfile::TempDir;

    #[test]
    fn test_listings_cover_builtins_with_exact_argv() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let config = Config::discover_from(dir.path(), &CliArgs::default()).unwrap();

        let presets = listings(&config).unwrap();
        let names: Vec<_> = presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["deep", "instrumented", "quick"]);

        let instrumented = &presets[1];
        assert!(instrumented.default);
        assert_eq!(instrumented.mode, "capture");
        assert_eq!(
            instrumented.argv,
            vec![
                "myth",
                "analyze",
                "<target>",
                "--execution-timeout",
                "60",
                "--max-depth",
                "3",
                "--solver-timeout",
                "60000",
                "--pruning-factor",
                "0.8",
            ]
        );
        assert_eq!(presets[2].solc_json.as_deref(), Some("config/solc.json"));
    }
}
