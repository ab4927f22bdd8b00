//! Line layout of a parsed file
//!
//! Declarations are moved line by line, so the syntax tree has to be mapped back onto lines.
//! [Outline] records, per line, whether it holds code or comments and whether a multi-line token
//! (a block comment or a raw string) runs through it. [Placement] locates one top-level item on
//! those lines: where its doc comment starts, where it ends, and whether it has its lines to
//! itself.
//!
//! A doc comment is the run of comment-only lines directly above the item's keyword line. A
//! blank line ends the run, so a comment separated from the item stays where it is. The run never
//! starts inside a block comment that opened on an earlier line.

use std::ops::Range;

use super::parser::ParsedFile;
use super::token::Token;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineInfo {
    pub has_code: bool,
    pub has_comment: bool,
    /// A token that started on an earlier line runs into this one
    pub continued: bool,
    /// A token on this line runs past its end
    pub open_at_end: bool,
}

impl LineInfo {
    pub fn is_blank(&self) -> bool {
        !self.has_code && !self.has_comment && !self.continued
    }

    pub fn is_comment_only(&self) -> bool {
        self.has_comment && !self.has_code
    }
}

#[derive(Debug, Clone)]
pub struct Outline {
    lines: Vec<LineInfo>,
}

impl Outline {
    pub fn new(parsed: &ParsedFile) -> Self {
        let mut lines = vec![LineInfo::default(); parsed.location.line_count()];

        for (token, span) in &parsed.tokens {
            if *token == Token::Newline {
                continue;
            }
            let first = parsed.location.line_of(span.start);
            let last = parsed.location.last_line_of(span);
            for (index, line) in lines.iter_mut().enumerate().take(last + 1).skip(first) {
                if token.is_comment() {
                    line.has_comment = true;
                } else {
                    line.has_code = true;
                }
                if index > first {
                    line.continued = true;
                }
                if index < last {
                    line.open_at_end = true;
                }
            }
        }

        Self { lines }
    }

    /// Layout of a 0-based line; lines past the end are blank
    pub fn line(&self, index: usize) -> LineInfo {
        self.lines.get(index).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First line of the doc comment above `keyword_line`, never above `floor`
    pub fn doc_start(&self, keyword_line: usize, floor: usize) -> usize {
        let mut start = keyword_line;
        while start > floor && self.line(start - 1).is_comment_only() {
            start -= 1;
        }
        while start < keyword_line && self.line(start).continued {
            start += 1;
        }
        start
    }
}

/// Where a top-level item sits on the lines of the file. Lines are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub keyword: Token,
    /// First line of the attached doc comment, or the keyword line without one
    pub start_line: usize,
    pub keyword_line: usize,
    /// Last line, trailing comments on that line included
    pub end_line: usize,
    /// Nothing but the item (and comments) on its first line
    pub starts_line: bool,
    /// Nothing but comments or an explicit `;` after the item on its last line
    pub ends_line: bool,
}

impl Placement {
    pub fn has_doc(&self) -> bool {
        self.start_line < self.keyword_line
    }

    /// Whether the item owns all of its lines and can be moved
    pub fn is_movable(&self) -> bool {
        self.starts_line && self.ends_line
    }
}

/// Place every item after the package clause, in source order
pub fn place_items(parsed: &ParsedFile, outline: &Outline) -> Vec<Placement> {
    let location = &parsed.location;
    let mut floor = location.last_line_of(&parsed.file.package) + 1;
    let mut placements = Vec::new();

    for (keyword, span) in parsed.file.items() {
        let placement = place(parsed, outline, keyword, &span, floor);
        floor = placement.end_line + 1;
        placements.push(placement);
    }

    placements
}

fn place(
    parsed: &ParsedFile,
    outline: &Outline,
    keyword: Token,
    span: &Range<usize>,
    floor: usize,
) -> Placement {
    let location = &parsed.location;
    let tokens = &parsed.tokens;
    let keyword_line = location.line_of(span.start);

    let first = tokens.partition_point(|(_, range)| range.start < span.start);
    let starts_line = !outline.line(keyword_line).continued
        && tokens[..first]
            .iter()
            .rev()
            .take_while(|(token, _)| *token != Token::Newline)
            .all(|(token, _)| token.is_comment());

    let mut end_line = location.last_line_of(span);
    let mut ends_line = true;
    let after = tokens.partition_point(|(_, range)| range.start < span.end);
    for (token, range) in &tokens[after..] {
        if location.line_of(range.start) != end_line || *token == Token::Newline {
            break;
        }
        match token {
            Token::LineComment | Token::BlockComment => end_line = location.last_line_of(range),
            Token::Semicolon => {}
            _ => {
                ends_line = false;
                break;
            }
        }
    }

    let start_line = if starts_line {
        outline.doc_start(keyword_line, floor)
    } else {
        keyword_line
    };

    Placement {
        keyword,
        start_line,
        keyword_line,
        end_line,
        starts_line,
        ends_line,
    }
}
