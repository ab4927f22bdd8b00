//! # goreorder
//!
//! Reorders the top-level declarations of Go source files.
//!
//! Declarations are extracted with their doc comments, grouped by category
//! (constants, variables, interfaces, types with their constructors and
//! methods, functions) and re-emitted in a configurable order. Everything
//! that is not moved, orphan comments included, stays byte-for-byte where it
//! was. The result is then handed to a formatter and optionally rendered as a
//! unified diff.
//!
//! The entry point is [`reorder_source`]; see the [ordering] module for the
//! individual stages.

pub mod ordering;

pub use ordering::{
    reorder_source, Category, Declaration, ParsedInfo, Pipeline, ReorderConfig, ReorderError,
    ReorderFailure,
};
pub use ordering::order::{Order, OrderPlanner, ResolvedOrder};
