//! Doctor command implementation
//!
//! Handles `mythwrap doctor` command for environment health checks.

use std::io;
use std::path::Path;

use mythwrap_doctor::DoctorCommand;

use crate::{Config, ExitCode, MythwrapError};

/// Execute the doctor command for environment health checks
pub fn execute_doctor_command(
    json: bool,
    config: &Config,
    base_dir: &Path,
) -> Result<ExitCode, MythwrapError> {
    let output = DoctorCommand::new(config.clone(), base_dir).run();

    if json {
        let json_output = serde_json::to_string_pretty(&output).map_err(io::Error::other)?;
        println!("{json_output}");
    } else {
        println!("mythwrap doctor");
        for check in &output.checks {
            println!("  {} {}: {}", check.status.symbol(), check.name, check.details);
        }
        if !output.ok {
            println!();
            println!("Some checks failed. Please address the issues above before running an analysis.");
        }
    }

    // Any failed check means a non-zero exit
    if output.ok {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
