//! Process execution for the external analyzer
//!
//! Provides three ways to run a child process built from a [`CommandSpec`]:
//! blocking capture ([`NativeRunner`]), live line streaming
//! ([`StreamingRunner`]), and inherited stdio ([`InheritRunner`]).
//!
//! # Security Model
//!
//! All process execution goes through [`CommandSpec`] to ensure argv-style invocation.
//! This prevents shell injection attacks by ensuring arguments are passed as discrete
//! elements rather than shell strings.
//!
//! None of the runners enforce a timeout. Time budgets are passed to the
//! analyzer as its own flags.

pub mod command_spec;
pub mod error;
pub mod inherit;
pub mod native;
pub mod process;
pub mod streaming;
pub mod types;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use inherit::InheritRunner;
pub use native::NativeRunner;
pub use process::{ProcessOutput, ProcessRunner};
pub use streaming::{StreamOutcome, StreamingRunner};
pub use types::RunMode;
