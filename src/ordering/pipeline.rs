//! Pipeline that runs one reorder invocation
//!
//! Extract, plan, splice, format and optionally diff. Every error after the source has been read
//! carries the original text, so a caller can always fall back to it.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, trace};

use super::diff::{diff_tool_for, DiffTool};
use super::error::{ReorderError, ReorderFailure};
use super::extract::extract;
use super::format::{self, formatter_for, Formatter};
use super::order::{Order, OrderPlanner};
use super::splice::splice;

/// Options for one reorder invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderConfig {
    /// Used in diagnostics and diff headers, and read when `source` is absent
    pub filename: PathBuf,
    /// Input bytes; the file is read when this is `None` or empty
    pub source: Option<Vec<u8>>,
    /// `"builtin"` or the name of a formatter executable
    pub format_tool: String,
    /// `"builtin"` or the name of a `diff` executable
    pub diff_tool: String,
    pub reorder_types: bool,
    pub order: Option<Vec<Order>>,
    /// Return a unified diff instead of the reordered text
    pub diff: bool,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::new(),
            source: None,
            format_tool: format::BUILTIN.to_string(),
            diff_tool: "diff".to_string(),
            reorder_types: false,
            order: None,
            diff: false,
        }
    }
}

impl ReorderConfig {
    pub fn for_file(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    pub fn for_source(filename: impl Into<PathBuf>, source: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            source: Some(source.into()),
            ..Self::default()
        }
    }
}

/// Reorder one file with the tools named in `config`
pub fn reorder_source(config: &ReorderConfig) -> Result<String, ReorderFailure> {
    Pipeline::from_config(config).run(config)
}

/// Formatter, diff tool and default order used to process files
pub struct Pipeline {
    formatter: Box<dyn Formatter>,
    diff_tool: Box<dyn DiffTool>,
    planner: OrderPlanner,
}

impl Pipeline {
    /// Builtin formatter, external `diff`, standard order
    pub fn new() -> Self {
        Self {
            formatter: formatter_for(format::BUILTIN),
            diff_tool: diff_tool_for("diff"),
            planner: OrderPlanner::default(),
        }
    }

    pub fn from_config(config: &ReorderConfig) -> Self {
        Self::new()
            .with_formatter(formatter_for(&config.format_tool))
            .with_diff_tool(diff_tool_for(&config.diff_tool))
    }

    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_diff_tool(mut self, diff_tool: Box<dyn DiffTool>) -> Self {
        self.diff_tool = diff_tool;
        self
    }

    pub fn with_planner(mut self, planner: OrderPlanner) -> Self {
        self.planner = planner;
        self
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub fn diff_tool(&self) -> &dyn DiffTool {
        self.diff_tool.as_ref()
    }

    /// Run every stage on the input described by `config`
    ///
    /// The tool names in `config` are ignored; the pipeline's own formatter and diff tool are
    /// used.
    pub fn run(&self, config: &ReorderConfig) -> Result<String, ReorderFailure> {
        let filename = &config.filename;

        // Step 1: Input
        let bytes = match &config.source {
            Some(bytes) if !bytes.is_empty() => bytes.clone(),
            _ => fs::read(filename).map_err(|source| {
                ReorderFailure::new(
                    ReorderError::Io {
                        path: filename.clone(),
                        source,
                    },
                    None,
                )
            })?,
        };
        let original = String::from_utf8(bytes).map_err(|_| {
            ReorderFailure::new(
                ReorderError::Encoding {
                    filename: filename.clone(),
                },
                None,
            )
        })?;
        trace!(target: "goreorder::pipeline", file = %filename.display(), bytes = original.len(), "read source");

        // Step 2: Extract and plan
        let info = extract(&original).map_err(|source| {
            ReorderFailure::new(
                ReorderError::Parse {
                    filename: filename.clone(),
                    source,
                },
                Some(original.clone()),
            )
        })?;
        let plan = self.planner.resolve(config.order.as_deref());
        debug!(
            target: "goreorder::pipeline",
            file = %filename.display(),
            order = %plan,
            declarations = info.declarations().count(),
            "planned reorder"
        );

        // Step 3: Splice and format
        let spliced = splice(&original, &info, &plan, config.reorder_types);
        let formatted = self
            .formatter
            .format(&spliced)
            .map_err(|error| ReorderFailure::new(error, Some(original.clone())))?;

        if !config.diff {
            return Ok(formatted);
        }

        // Step 4: Diff
        self.diff_tool
            .diff(&original, &formatted, filename)
            .map_err(|error| ReorderFailure::new(error, Some(original.clone())))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::diff::UnifiedDiff;
    use crate::ordering::error::FormatError;

    const UNORDERED: &str = "package main

import \"fmt\"

func b() {}

var x = 1

const c = 2

func a() { fmt.Println(x, c) }
";

    const ORDERED: &str = "package main

import \"fmt\"

const c = 2

var x = 1

func a() { fmt.Println(x, c) }

func b() {}
";

    #[test]
    fn test_reorders_and_formats() {
        let config = ReorderConfig::for_source("main.go", UNORDERED);
        assert_eq!(reorder_source(&config).unwrap(), ORDERED);
    }

    #[test]
    fn test_idempotent() {
        let config = ReorderConfig::for_source("main.go", ORDERED);
        assert_eq!(reorder_source(&config).unwrap(), ORDERED);
    }

    #[test]
    fn test_reads_file_when_no_source_is_given() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.go");
        fs::write(&path, UNORDERED).unwrap();

        let mut config = ReorderConfig::for_file(&path);
        assert_eq!(reorder_source(&config).unwrap(), ORDERED);

        config.source = Some(Vec::new());
        assert_eq!(reorder_source(&config).unwrap(), ORDERED);
    }

    #[test]
    fn test_missing_file_has_no_fallback() {
        let failure = reorder_source(&ReorderConfig::for_file("does/not/exist.go")).unwrap_err();
        assert!(matches!(failure.error, ReorderError::Io { .. }));
        assert_eq!(failure.original, None);
    }

    #[test]
    fn test_invalid_utf8() {
        let config = ReorderConfig::for_source("main.go", vec![b'p', 0xff, 0xfe]);
        let failure = reorder_source(&config).unwrap_err();
        assert!(matches!(failure.error, ReorderError::Encoding { .. }));
    }

    #[test]
    fn test_malformed_source_falls_back_to_original() {
        let source = "package main\n\nfunc main() {\n";
        let failure = reorder_source(&ReorderConfig::for_source("bad.go", source)).unwrap_err();
        assert!(matches!(failure.error, ReorderError::Parse { .. }));
        assert!(failure.to_string().starts_with("cannot parse bad.go: "));
        assert_eq!(failure.original.as_deref(), Some(source));
    }

    #[test]
    fn test_missing_formatter_falls_back_to_original() {
        let config = ReorderConfig {
            format_tool: "goreorder-no-such-formatter".to_string(),
            ..ReorderConfig::for_source("main.go", UNORDERED)
        };
        let failure = reorder_source(&config).unwrap_err();
        assert!(matches!(
            failure.error,
            ReorderError::Format(FormatError::NotFound { .. })
        ));
        assert_eq!(failure.original.as_deref(), Some(UNORDERED));
    }

    #[test]
    fn test_diff_output() {
        let config = ReorderConfig {
            diff: true,
            ..ReorderConfig::for_source("cmd/main.go", UNORDERED)
        };
        let pipeline = Pipeline::from_config(&config).with_diff_tool(Box::new(UnifiedDiff));
        assert_eq!(pipeline.diff_tool().name(), "builtin");

        let patch = pipeline.run(&config).unwrap();
        assert!(patch.starts_with("--- a/cmd/main.go\n+++ b/cmd/main.go\n"));
        assert!(patch.contains("+const c = 2\n"));
        assert!(patch.contains("-func b() {}\n"));
    }

    #[test]
    fn test_custom_planner_defaults() {
        let config = ReorderConfig::for_source("main.go", UNORDERED);
        let pipeline = Pipeline::new().with_planner(OrderPlanner::new(vec![Order::Func, Order::Var]));
        let result = pipeline.run(&config).unwrap();
        let a = result.find("func a()").unwrap();
        let x = result.find("var x").unwrap();
        assert!(a < x);
        // const is not a default of this planner and stays where it was
        assert!(result.contains("\nconst c = 2\n"));
    }
}
