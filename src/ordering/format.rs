//! Formatter adapters
//!
//! The spliced text is handed to a [Formatter] before it is returned. [BuiltinFormatter] works
//! in memory: it re-parses the text and normalizes the vertical layout of the file the way
//! `gofmt` lays out top-level declarations. [ExternalFormatter] writes the text to a temporary
//! file and runs a Go formatter (`gofmt`, `goimports`, ...) on it with `-w`.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::process::Command;

use tracing::debug;

use super::error::{FormatError, ProcessError};
use super::outline::{place_items, Outline};
use super::parser::parse;

/// Name selecting the in-process formatter
pub const BUILTIN: &str = "builtin";

/// Trait for source formatters
pub trait Formatter: Send + Sync {
    /// The name of this formatter (e.g., "builtin", "gofmt")
    fn name(&self) -> &str;

    /// Format Go source text
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// Pick the formatter for a tool name
pub fn formatter_for(tool: &str) -> Box<dyn Formatter> {
    if tool == BUILTIN {
        Box::new(BuiltinFormatter)
    } else {
        Box::new(ExternalFormatter::new(tool))
    }
}

/// In-process layout normalization
///
/// - trailing whitespace is removed, except inside raw strings and block comments
/// - leading blank lines are dropped and runs of blank lines collapse into one
/// - the file ends with exactly one newline
/// - the package clause is followed by a blank line
/// - a blank line separates two top-level items of different kinds, and precedes every item
///   with a doc comment
///
/// Indentation inside declarations is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFormatter;

impl Formatter for BuiltinFormatter {
    fn name(&self) -> &str {
        BUILTIN
    }

    fn format(&self, source: &str) -> Result<String, FormatError> {
        let parsed = parse(source)?;
        let outline = Outline::new(&parsed);
        let placements = place_items(&parsed, &outline);

        let mut separated: HashSet<usize> = HashSet::new();
        separated.insert(parsed.location.last_line_of(&parsed.file.package) + 1);
        let mut previous = None;
        for placement in &placements {
            if placement.starts_line
                && (previous != Some(placement.keyword) || placement.has_doc())
            {
                separated.insert(placement.start_line);
            }
            previous = Some(placement.keyword);
        }

        let mut output: Vec<&str> = Vec::new();
        let mut pending_blank = false;
        for (index, line) in source.split('\n').enumerate() {
            let layout = outline.line(index);
            let text = if layout.open_at_end { line } else { line.trim_end() };

            if layout.continued {
                output.push(text);
                pending_blank = false;
            } else if text.is_empty() {
                pending_blank = true;
            } else {
                if (pending_blank || separated.contains(&index)) && !output.is_empty() {
                    output.push("");
                }
                output.push(text);
                pending_blank = false;
            }
        }

        let mut formatted = output.join("\n");
        formatted.push('\n');
        Ok(formatted)
    }
}

/// A formatter executable run as `<tool> -w <file>`
#[derive(Debug, Clone)]
pub struct ExternalFormatter {
    tool: String,
}

impl ExternalFormatter {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }
}

impl Formatter for ExternalFormatter {
    fn name(&self) -> &str {
        &self.tool
    }

    fn format(&self, source: &str) -> Result<String, FormatError> {
        let program = which::which(&self.tool).map_err(|_| FormatError::NotFound {
            tool: self.tool.clone(),
        })?;

        // Removed when dropped, on every path
        let mut file = tempfile::Builder::new()
            .prefix("goreorder-")
            .suffix(".go")
            .tempfile()?;
        file.write_all(source.as_bytes())?;
        file.flush()?;

        debug!(
            target: "goreorder::format",
            tool = %program.display(),
            file = %file.path().display(),
            "running formatter"
        );
        let output = Command::new(&program).arg("-w").arg(file.path()).output()?;
        if !output.status.success() {
            return Err(ProcessError {
                tool: self.tool.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(fs::read_to_string(file.path())?)
    }
}
