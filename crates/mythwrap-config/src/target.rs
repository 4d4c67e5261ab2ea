//! Contract discovery by directory convention

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use mythwrap_utils::error::{ConfigError, MythwrapError};

/// One place to look for targets: a directory and a glob relative to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCandidate {
    pub dir: PathBuf,
    pub pattern: String,
}

impl TargetCandidate {
    pub fn new(dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            pattern: pattern.into(),
        }
    }

    /// `dir/pattern`, for messages.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{}/{}", self.dir.display(), self.pattern)
    }

    fn matcher(&self) -> Result<GlobMatcher, ConfigError> {
        GlobBuilder::new(&self.pattern)
            .literal_separator(true)
            .build()
            .map(|g| g.compile_matcher())
            .map_err(|e| ConfigError::InvalidValue {
                key: "targets.pattern".to_string(),
                value: format!("{}: {e}", self.pattern),
            })
    }
}

/// Ordered list of candidates. Earlier candidates take priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRule {
    pub candidates: Vec<TargetCandidate>,
}

impl Default for TargetRule {
    /// Instrumented sources first, then instrumented copies beside the originals.
    fn default() -> Self {
        Self {
            candidates: vec![
                TargetCandidate::new("instrumented", "**/*.sol"),
                TargetCandidate::new("contracts", "**/*.sol.instrumented"),
            ],
        }
    }
}

impl TargetRule {
    /// Plain contract sources under `contracts/`.
    #[must_use]
    pub fn contracts() -> Self {
        Self {
            candidates: vec![TargetCandidate::new("contracts", "**/*.sol")],
        }
    }

    /// Resolve targets under `base`.
    ///
    /// Returned paths are relative to `base` (`instrumented/Vault.sol`).
    /// Within a candidate, matches are sorted; candidate order is kept.
    /// A missing candidate directory contributes nothing. An empty result is
    /// a [`MythwrapError::NoTargets`] precondition failure.
    pub fn locate(&self, base: &Path) -> Result<Vec<PathBuf>, MythwrapError> {
        let mut found = Vec::new();

        for (index, candidate) in self.candidates.iter().enumerate() {
            let root = base.join(&candidate.dir);
            if !root.is_dir() {
                if index == 0 {
                    warn!(
                        dir = %candidate.dir.display(),
                        "Target directory not found, checking remaining locations"
                    );
                } else {
                    debug!(dir = %candidate.dir.display(), "Target directory not found");
                }
                continue;
            }

            let matcher = candidate.matcher()?;
            let mut relative = Vec::new();
            walk_files(&root, Path::new(""), &mut relative)?;
            relative.retain(|rel| matcher.is_match(rel));
            relative.sort();

            debug!(
                pattern = %candidate.describe(),
                matches = relative.len(),
                "Scanned target directory"
            );
            found.extend(relative.into_iter().map(|rel| candidate.dir.join(rel)));
        }

        if found.is_empty() {
            return Err(MythwrapError::NoTargets {
                searched: self.candidates.iter().map(TargetCandidate::describe).collect(),
            });
        }
        Ok(found)
    }
}

/// Collect every regular file under `root`, as paths relative to it.
///
/// Symlinks to files are followed. Symlinked directories are not entered, so
/// a link cycle cannot recurse forever.
fn walk_files(root: &Path, rel: &Path, out: &mut Vec<PathBuf>) -> Result<(), MythwrapError> {
    for entry in fs::read_dir(root.join(rel))? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let child = rel.join(entry.file_name());
        if file_type.is_dir() {
            walk_files(root, &child, out)?;
        } else if file_type.is_file() {
            out.push(child);
        } else if file_type.is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => out.push(child),
                Ok(_) => debug!(path = %child.display(), "Skipping symlink to non-file"),
                Err(e) => debug!(path = %child.display(), error = %e, "Skipping dangling symlink"),
            }
        }
    }
    Ok(())
}

/// Check that explicitly supplied targets exist under `base`.
pub fn verify_explicit(targets: &[PathBuf], base: &Path) -> Result<Vec<PathBuf>, MythwrapError> {
    for target in targets {
        if !base.join(target).is_file() {
            return Err(MythwrapError::TargetMissing {
                path: target.clone(),
            });
        }
    }
    Ok(targets.to_vec())
}
