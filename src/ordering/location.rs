//! Conversion from byte offsets to line/column positions
//!
//! Lines and columns are 0-based here; callers that report to users add one.

use std::fmt;

/// A line:column position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Provides fast conversion from byte offsets to line/column positions
#[derive(Debug, Clone)]
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self { line_starts }
    }

    /// Convert a byte offset to a line/column position. Columns count characters.
    pub fn byte_to_position(&self, source: &str, byte_offset: usize) -> Position {
        let line = self.line_of(byte_offset);
        let start = self.line_starts[line];
        let end = byte_offset.min(source.len());
        let column = source
            .get(start..end)
            .map(|text| text.chars().count())
            .unwrap_or(end - start);

        Position::new(line, column)
    }

    /// Line holding the given byte offset
    pub fn line_of(&self, byte_offset: usize) -> usize {
        self.line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1)
    }

    /// Line holding the last byte of a non-empty range
    pub fn last_line_of(&self, range: &std::ops::Range<usize>) -> usize {
        self.line_of(range.end.max(range.start + 1) - 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
