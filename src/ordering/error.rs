//! Error types for the reordering pipeline
//!
//! Every stage has its own error type. [ReorderError] gathers them for the pipeline, and
//! [ReorderFailure] pairs the error with the content a caller should fall back to, so the input
//! is never lost.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Malformed Go source. Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// An external tool that exited unsuccessfully
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ProcessError {
    pub tool: String,
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stderr: String,
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "`{}` exited with status {}", self.tool, code)?,
            None => write!(f, "`{}` was terminated by a signal", self.tool)?,
        }
        if !self.stderr.is_empty() {
            write!(f, ": {}", self.stderr)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    /// The text handed to the formatter does not parse
    #[error("formatter input is not valid Go: {0}")]
    Syntax(#[from] ParseError),
    #[error("formatter `{tool}` not found in PATH")]
    NotFound { tool: String },
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("formatter I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("diff tool `{tool}` not found in PATH")]
    NotFound { tool: String },
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("diff I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ReorderError {
    #[error("cannot parse {}: {source}", .filename.display())]
    Parse {
        filename: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("{} is not valid UTF-8", .filename.display())]
    Encoding { filename: PathBuf },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Diff(#[from] DiffError),
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A failed reorder together with the content the caller should keep
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ReorderFailure {
    #[source]
    pub error: ReorderError,
    /// The original text, or `None` when it could not even be read
    pub original: Option<String>,
}

impl ReorderFailure {
    pub fn new(error: impl Into<ReorderError>, original: Option<String>) -> Self {
        Self {
            error: error.into(),
            original,
        }
    }
}
