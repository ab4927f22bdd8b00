//! Unified diffs between the original and the reordered file
//!
//! [ExternalDiff] mirrors the file's directory under two temporary roots, writes the original
//! under one and the result under the other, and runs `diff -Naur` on the roots. The roots are
//! then rewritten to `a/` and `b/` so the output applies with `patch -p1`. [UnifiedDiff] builds
//! the same kind of patch in memory.

use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use similar::TextDiff;
use tempfile::TempDir;
use tracing::debug;

use super::error::{DiffError, ProcessError};

/// Name selecting the in-process diff
pub const BUILTIN: &str = "builtin";

/// Trait for diff producers
pub trait DiffTool: Send + Sync {
    /// The name of this tool (e.g., "diff", "builtin")
    fn name(&self) -> &str;

    /// Unified diff from `original` to `modified` for the file at `filename`
    fn diff(&self, original: &str, modified: &str, filename: &Path) -> Result<String, DiffError>;
}

/// Pick the diff tool for a tool name
pub fn diff_tool_for(tool: &str) -> Box<dyn DiffTool> {
    if tool == BUILTIN {
        Box::new(UnifiedDiff)
    } else {
        Box::new(ExternalDiff::new(tool))
    }
}

/// Directory part of `filename` reduced to its normal components
fn mirrored_dir(filename: &Path) -> PathBuf {
    filename
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|component| match component {
                    Component::Normal(part) => Some(part),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn file_name(filename: &Path) -> &OsStr {
    filename.file_name().unwrap_or_else(|| OsStr::new("source.go"))
}

/// Path of the file inside the `a/` and `b/` trees, with `/` separators
fn patch_path(filename: &Path) -> String {
    let path = mirrored_dir(filename).join(file_name(filename));
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A `diff` executable run as `<tool> -Naur <a> <b>`
#[derive(Debug, Clone)]
pub struct ExternalDiff {
    tool: String,
}

impl ExternalDiff {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    fn write_tree(root: &TempDir, filename: &Path, content: &str) -> Result<(), DiffError> {
        let dir = root.path().join(mirrored_dir(filename));
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(file_name(filename)), content)?;
        Ok(())
    }
}

impl Default for ExternalDiff {
    fn default() -> Self {
        Self::new("diff")
    }
}

impl DiffTool for ExternalDiff {
    fn name(&self) -> &str {
        &self.tool
    }

    fn diff(&self, original: &str, modified: &str, filename: &Path) -> Result<String, DiffError> {
        let program = which::which(&self.tool).map_err(|_| DiffError::NotFound {
            tool: self.tool.clone(),
        })?;

        // Both trees are removed when dropped, on every path
        let left = tempfile::Builder::new().prefix("goreorder-a-").tempdir()?;
        let right = tempfile::Builder::new().prefix("goreorder-b-").tempdir()?;
        Self::write_tree(&left, filename, original)?;
        Self::write_tree(&right, filename, modified)?;

        debug!(
            target: "goreorder::diff",
            tool = %program.display(),
            file = %filename.display(),
            "running diff"
        );
        let output = Command::new(&program)
            .arg("-Naur")
            .arg(left.path())
            .arg(right.path())
            .output()?;

        match output.status.code() {
            Some(0) | Some(1) => {
                let text = String::from_utf8_lossy(&output.stdout);
                let left_root = format!("{}/", left.path().display());
                let right_root = format!("{}/", right.path().display());
                Ok(text.replace(&left_root, "a/").replace(&right_root, "b/"))
            }
            code => Err(ProcessError {
                tool: self.tool.clone(),
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into()),
        }
    }
}

/// In-process unified diff with `a/` and `b/` headers
#[derive(Debug, Clone, Copy, Default)]
pub struct UnifiedDiff;

impl DiffTool for UnifiedDiff {
    fn name(&self) -> &str {
        BUILTIN
    }

    fn diff(&self, original: &str, modified: &str, filename: &Path) -> Result<String, DiffError> {
        if original == modified {
            return Ok(String::new());
        }
        let path = patch_path(filename);
        let diff = TextDiff::from_lines(original, modified);
        Ok(diff
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{path}"), &format!("b/{path}"))
            .to_string())
    }
}
