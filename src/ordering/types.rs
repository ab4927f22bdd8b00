//! Data model shared by extraction and splicing

use std::collections::HashMap;
use std::fmt;

/// Classification of a movable declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Const,
    Var,
    Interface,
    Type,
    Func,
    Method,
    Constructor,
}

impl Category {
    /// Functions, methods and constructors
    pub fn is_function(self) -> bool {
        matches!(
            self,
            Category::Func | Category::Method | Category::Constructor
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Const => "const",
            Category::Var => "var",
            Category::Interface => "interface",
            Category::Type => "type",
            Category::Func => "func",
            Category::Method => "method",
            Category::Constructor => "constructor",
        };
        f.write_str(name)
    }
}

/// Inclusive, 1-based line range in the original file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start_line: usize,
    pub end_line: usize,
}

impl Span {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        debug_assert!(start_line >= 1 && start_line <= end_line);
        Self {
            start_line,
            end_line,
        }
    }

    /// 0-based indices of the covered lines
    pub fn line_indices(&self) -> std::ops::Range<usize> {
        self.start_line - 1..self.end_line
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start_line <= other.end_line && other.start_line <= self.end_line
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_line, self.end_line)
    }
}

/// One classified, movable unit of source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Sort key: the declared name, or the first name of a block
    pub name: String,
    /// Every name the unit declares, in source order
    pub members: Vec<String>,
    pub category: Category,
    /// Receiver type of a method, constructed type of a constructor
    pub owner: Option<String>,
    /// Doc comment and declaration lines, joined with `\n`
    pub text: String,
    pub span: Span,
}

/// Everything extraction found in one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInfo {
    pub constants: Vec<Declaration>,
    pub variables: Vec<Declaration>,
    pub interfaces: HashMap<String, Declaration>,
    /// Interface names in discovery order
    pub interface_names: Vec<String>,
    pub types: HashMap<String, Declaration>,
    /// Type names in discovery order
    pub type_names: Vec<String>,
    /// Free functions in discovery order. A list, since `init` may be declared many times.
    pub functions: Vec<Declaration>,
    pub methods: HashMap<String, Vec<Declaration>>,
    pub constructors: HashMap<String, Vec<Declaration>>,
}

impl ParsedInfo {
    /// Free functions with the given name
    pub fn functions_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Declaration> {
        self.functions.iter().filter(move |decl| decl.name == name)
    }

    /// All declarations, in no particular order
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.constants
            .iter()
            .chain(&self.variables)
            .chain(self.interfaces.values())
            .chain(self.types.values())
            .chain(&self.functions)
            .chain(self.methods.values().flatten())
            .chain(self.constructors.values().flatten())
    }

    pub fn is_empty(&self) -> bool {
        self.declarations().next().is_none()
    }
}
