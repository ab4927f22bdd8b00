//! Declaration reordering engine
//!
//!     The engine works in stages, each living in its own module:
//!
//!     Lexing:
//!         [lexer] turns Go source into `(Token, byte range)` pairs with logos and derives the
//!         parser stream from them by applying Go's automatic semicolon insertion.
//!
//!     Parsing:
//!         [parser] is a chumsky grammar over the parser stream. It only cares about the
//!         top-level structure: the package clause, imports, and `const`/`var`/`type`/`func`
//!         declarations kept as token trees ([ast]). Anything it cannot shape into that
//!         structure is a [ParseError](error::ParseError).
//!
//!     Outline:
//!         [outline] maps the syntax tree back onto lines: which lines are comment-only, which
//!         lines sit inside multi-line tokens, where each declaration's doc comment starts and
//!         whether a declaration owns the lines it sits on.
//!
//!     Extraction:
//!         [extract] classifies declarations into [Category] buckets and produces [ParsedInfo].
//!
//!     Planning and splicing:
//!         [order] completes the requested category order, [splice] removes every moved
//!         declaration from its original lines and re-inserts them all at a single injection
//!         point.
//!
//!     Formatting and diffing:
//!         [format] and [diff] put the external tools behind the [Formatter](format::Formatter)
//!         and [DiffTool](diff::DiffTool) traits, each with an in-process implementation.
//!
//!     [pipeline] wires the stages together for one file.

pub mod ast;
pub mod diff;
pub mod error;
pub mod extract;
pub mod format;
pub mod lexer;
pub mod location;
pub mod order;
pub mod outline;
pub mod parser;
pub mod pipeline;
pub mod splice;
pub mod token;
pub mod types;

pub use error::{ReorderError, ReorderFailure};
pub use extract::extract;
pub use pipeline::{reorder_source, Pipeline, ReorderConfig};
pub use splice::splice;
pub use types::{Category, Declaration, ParsedInfo, Span};
