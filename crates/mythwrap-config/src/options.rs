//! Analyzer flags

use serde::{Deserialize, Serialize};

/// Named analyzer options. Each `Some` field becomes one flag/value pair;
/// `None` fields are left to the analyzer's own defaults.
///
/// Time budgets here are passed to the analyzer. mythwrap itself never
/// enforces them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyzerOptions {
    /// `--execution-timeout`, seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_timeout: Option<u64>,
    /// `--max-depth`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    /// `--solver-timeout`, milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver_timeout: Option<u64>,
    /// `--pruning-factor`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pruning_factor: Option<f64>,
    /// `-m`, joined with commas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<String>>,
    /// `--strategy` (dfs, bfs, naive-random, weighted-random)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// `-t`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<u32>,
    /// `--solv`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solidity_version: Option<String>,
    /// Appended verbatim after every other flag
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
}

impl AnalyzerOptions {
    /// Render to flags in a fixed order.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        let mut push = |flag: &str, value: String| {
            args.push(flag.to_string());
            args.push(value);
        };

        if let Some(v) = self.execution_timeout {
            push("--execution-timeout", v.to_string());
        }
        if let Some(v) = self.max_depth {
            push("--max-depth", v.to_string());
        }
        if let Some(v) = self.solver_timeout {
            push("--solver-timeout", v.to_string());
        }
        if let Some(v) = self.pruning_factor {
            push("--pruning-factor", v.to_string());
        }
        if let Some(ref modules) = self.modules {
            if !modules.is_empty() {
                push("-m", modules.join(","));
            }
        }
        if let Some(ref v) = self.strategy {
            push("--strategy", v.clone());
        }
        if let Some(v) = self.transaction_count {
            push("-t", v.to_string());
        }
        if let Some(ref v) = self.solidity_version {
            push("--solv", v.clone());
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Overlay `other` on top of `self`: every field set in `other` wins.
    pub fn merge(&mut self, other: &AnalyzerOptions) {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field.clone();
                })*
            };
        }
        overlay!(
            execution_timeout,
            max_depth,
            solver_timeout,
            pruning_factor,
            modules,
            strategy,
            transaction_count,
            solidity_version
        );
        if !other.extra_args.is_empty() {
            self.extra_args = other.extra_args.clone();
        }
    }
}
