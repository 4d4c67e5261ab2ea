//! Pipeline command implementation
//!
//! Handles `mythwrap pipeline`: Scribble instrumentation, Hardhat tests and,
//! with `--analyze`, the default analysis.

use std::io::{self, Write};
use std::path::Path;

use crate::cli::args::AnalyzeArgs;
use crate::pipeline::Pipeline;
use crate::{Config, ExitCode, MythwrapError};

use super::execute_analyze_command;

/// Execute the pipeline command
pub fn execute_pipeline_command(
    analyze: bool,
    analysis: &AnalyzeArgs,
    config: &Config,
    base_dir: &Path,
) -> Result<ExitCode, MythwrapError> {
    let pipeline = Pipeline::new(&config.pipeline, base_dir);

    let result = {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let result = pipeline.run(&mut out);
        out.flush()?;
        result
    };

    match result {
        Ok(()) => {}
        Err(MythwrapError::StepFailed { step, detail }) => {
            eprintln!("Error running {step}: {detail}");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err),
    }

    if analyze {
        println!("Starting Mythril analysis...");
        execute_analyze_command(analysis, config, base_dir)
    } else {
        println!("Pipeline completed. Run 'mythwrap analyze' to analyze the instrumented contracts.");
        Ok(ExitCode::SUCCESS)
    }
}
