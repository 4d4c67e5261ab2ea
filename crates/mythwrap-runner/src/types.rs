//! Types used by the runner module

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the analyzer's output is relayed to the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Run to completion, then print stdout (and stderr on failure)
    #[default]
    Capture,
    /// Print stdout line by line as the child produces it
    Stream,
}

impl RunMode {
    /// Convert run mode to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Capture => "capture",
            Self::Stream => "stream",
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "capture" => Ok(Self::Capture),
            "stream" => Ok(Self::Stream),
            other => Err(format!(
                "Unknown run mode '{other}'. Supported modes: capture, stream"
            )),
        }
    }
}
