//! CLI command implementations (facade).
//!
//! Each handler returns the exit code to use on completion, or a
//! [`MythwrapError`](crate::MythwrapError) for `run` to report.

mod analyze;
mod doctor;
mod pipeline;
mod presets;

pub use analyze::execute_analyze_command;
pub use doctor::execute_doctor_command;
pub use pipeline::execute_pipeline_command;
pub use presets::execute_presets_command;
