//! Declaration extraction
//!
//! Walks the top-level declarations of a parsed file and files each one under a [Category]:
//!
//! - `const` and `var` declarations become one unit per declaration. A parenthesized block is
//!   one unit named after its first name, so it moves as a whole. Units are keyed by span and
//!   never stored twice.
//! - `type` declarations whose underlying type is an interface are interfaces, every other named
//!   type (structs, aliases, basic and generic types) is a type. A `type ( ... )` block is an
//!   interface only when all of its specs are interfaces.
//! - Functions with a single `T`, `*T`, `name T` or `name *T` receiver are methods of `T`. Other
//!   receivers are left alone.
//! - Functions without receiver returning `T` or `*T` for a type `T` declared in the file are
//!   constructors of `T`. This is a heuristic: any function returning such a type qualifies.
//! - Every other function is a free function.
//!
//! Declarations that share a line with other code cannot be moved line-wise. They are left in
//! place and do not take part in classification.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::ast::{split_on, Decl, Delimiter, FuncDecl, GenDecl, TokenTree};
use super::error::ParseError;
use super::outline::{place_items, Outline, Placement};
use super::parser::{parse, ParsedFile};
use super::token::Token;
use super::types::{Category, Declaration, ParsedInfo, Span};

/// Extract and classify every movable top-level declaration of a Go source
pub fn extract(source: &str) -> Result<ParsedInfo, ParseError> {
    let parsed = parse(source)?;
    Ok(Extractor::new(source).run(&parsed))
}

struct Extractor<'s> {
    source: &'s str,
    lines: Vec<&'s str>,
    info: ParsedInfo,
    spans: HashSet<Span>,
    /// Every name declared by a `Type` declaration, block members included
    known_types: HashSet<String>,
}

impl<'s> Extractor<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            lines: source.split('\n').collect(),
            info: ParsedInfo::default(),
            spans: HashSet::new(),
            known_types: HashSet::new(),
        }
    }

    fn run(mut self, parsed: &ParsedFile) -> ParsedInfo {
        let outline = Outline::new(parsed);
        let placements = place_items(parsed, &outline);
        let decls: Vec<(&Decl, &Placement)> = parsed
            .file
            .decls
            .iter()
            .zip(&placements[parsed.file.imports.len()..])
            .filter(|(_, placement)| {
                if !placement.is_movable() {
                    debug!(
                        target: "goreorder::extract",
                        line = placement.keyword_line + 1,
                        "declaration shares its lines with other code, left in place"
                    );
                }
                placement.is_movable()
            })
            .collect();

        // Types first, constructors can only be recognized once all type names are known
        for (decl, placement) in &decls {
            if let Decl::Gen(gen) = decl {
                self.gen_decl(gen, placement);
            }
        }
        for (decl, placement) in &decls {
            if let Decl::Func(func) = decl {
                self.func_decl(func, placement);
            }
        }

        debug!(
            target: "goreorder::extract",
            constants = self.info.constants.len(),
            variables = self.info.variables.len(),
            interfaces = self.info.interfaces.len(),
            types = self.info.types.len(),
            functions = self.info.functions.len(),
            methods = self.info.methods.values().map(Vec::len).sum::<usize>(),
            constructors = self.info.constructors.values().map(Vec::len).sum::<usize>(),
            "extracted declarations"
        );
        self.info
    }

    fn gen_decl(&mut self, gen: &GenDecl, placement: &Placement) {
        match gen.keyword {
            Token::Const | Token::Var => {
                let members: Vec<String> = gen
                    .specs
                    .iter()
                    .flat_map(|spec| spec_names(spec, self.source))
                    .collect();
                let Some(name) = members.first().cloned() else {
                    trace!(target: "goreorder::extract", line = placement.keyword_line + 1, "empty block");
                    return;
                };
                let category = if gen.keyword == Token::Const {
                    Category::Const
                } else {
                    Category::Var
                };
                let decl = self.declaration(name, members, category, None, placement);
                if !self.spans.insert(decl.span) {
                    return;
                }
                match category {
                    Category::Const => self.info.constants.push(decl),
                    _ => self.info.variables.push(decl),
                }
            }
            Token::Type => {
                let mut members = Vec::new();
                let mut all_interfaces = true;
                for spec in &gen.specs {
                    let Some((name, is_interface)) = type_spec(spec, self.source) else {
                        debug!(
                            target: "goreorder::extract",
                            line = placement.keyword_line + 1,
                            "unrecognized type declaration, left in place"
                        );
                        return;
                    };
                    members.push(name);
                    all_interfaces &= is_interface;
                }
                let Some(name) = members.first().cloned() else {
                    return;
                };
                if self.info.types.contains_key(&name) || self.info.interfaces.contains_key(&name) {
                    debug!(target: "goreorder::extract", name = %name, "type declared twice, left in place");
                    return;
                }

                let category = if all_interfaces {
                    Category::Interface
                } else {
                    Category::Type
                };
                let decl = self.declaration(name.clone(), members, category, None, placement);
                if !self.spans.insert(decl.span) {
                    return;
                }
                if category == Category::Interface {
                    self.info.interface_names.push(name.clone());
                    self.info.interfaces.insert(name, decl);
                } else {
                    self.known_types.extend(decl.members.iter().cloned());
                    self.info.type_names.push(name.clone());
                    self.info.types.insert(name, decl);
                }
            }
            _ => {}
        }
    }

    fn func_decl(&mut self, func: &FuncDecl, placement: &Placement) {
        let name = self.source[func.name.clone()].to_string();

        if let Some(receiver) = &func.receiver {
            match receiver_type(receiver, self.source) {
                Some(owner) => {
                    let owner = owner.to_string();
                    let decl = self.declaration(
                        name,
                        Vec::new(),
                        Category::Method,
                        Some(owner.clone()),
                        placement,
                    );
                    push_grouped(&mut self.info.methods, owner, decl);
                }
                None => debug!(
                    target: "goreorder::extract",
                    method = %name,
                    line = placement.keyword_line + 1,
                    "unsupported receiver, method left in place"
                ),
            }
            return;
        }

        match constructed_type(&func.signature, self.source, &self.known_types) {
            Some(owner) => {
                let owner = owner.to_string();
                let decl = self.declaration(
                    name,
                    Vec::new(),
                    Category::Constructor,
                    Some(owner.clone()),
                    placement,
                );
                push_grouped(&mut self.info.constructors, owner, decl);
            }
            None => {
                let decl = self.declaration(name, Vec::new(), Category::Func, None, placement);
                self.info.functions.push(decl);
            }
        }
    }

    fn declaration(
        &self,
        name: String,
        mut members: Vec<String>,
        category: Category,
        owner: Option<String>,
        placement: &Placement,
    ) -> Declaration {
        if members.is_empty() {
            members.push(name.clone());
        }
        Declaration {
            name,
            members,
            category,
            owner,
            text: self.lines[placement.start_line..=placement.end_line].join("\n"),
            span: Span::new(placement.start_line + 1, placement.end_line + 1),
        }
    }
}

fn push_grouped(map: &mut HashMap<String, Vec<Declaration>>, owner: String, decl: Declaration) {
    map.entry(owner).or_default().push(decl);
}

/// Names declared by a const/var spec: `a`, `a, b`, ...
fn spec_names(spec: &[TokenTree], source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut trees = spec.iter();
    while let Some(name) = trees.next().and_then(|tree| tree.ident(source)) {
        names.push(name.to_string());
        if !trees.next().is_some_and(|tree| tree.is_leaf(Token::Comma)) {
            break;
        }
    }
    names
}

/// Name of a type spec and whether its underlying type is an interface
fn type_spec(spec: &[TokenTree], source: &str) -> Option<(String, bool)> {
    let (first, mut rest) = spec.split_first()?;
    let name = first.ident(source)?;

    if let Some((params, tail)) = rest.split_first() {
        if is_type_parameters(params, source) {
            rest = tail;
        }
    }
    if let Some((assign, tail)) = rest.split_first() {
        if assign.is_leaf(Token::Assign) {
            rest = tail;
        }
    }

    let is_interface = rest.first().is_some_and(|tree| tree.is_leaf(Token::Interface));
    Some((name.to_string(), is_interface))
}

/// `[T any]`, `[K, V comparable]`, `[S ~[]E, E any]`
///
/// An array length such as `[N]`, `[N*2]` or `[pkg.N]` is not. As in Go, `[P *C]` reads as an
/// array length.
fn is_type_parameters(tree: &TokenTree, source: &str) -> bool {
    if !tree.is_group(Delimiter::Bracket) {
        return false;
    }
    match tree.children() {
        [name, constraint, ..] if name.is_leaf(Token::Ident) => {
            constraint.is_group(Delimiter::Bracket)
                || source.get(constraint.span()) == Some("~")
                || matches!(
                    constraint.token(),
                    Some(
                        Token::Ident
                            | Token::Comma
                            | Token::Interface
                            | Token::Struct
                            | Token::Map
                            | Token::Chan
                            | Token::Func
                    )
                )
        }
        _ => false,
    }
}

/// Drop trailing type arguments: `Stack[T]` is `Stack`
fn strip_type_arguments(trees: &[TokenTree]) -> &[TokenTree] {
    match trees.split_last() {
        Some((last, init)) if !init.is_empty() && last.is_group(Delimiter::Bracket) => init,
        _ => trees,
    }
}

/// Type of a receiver list holding exactly one `T`, `*T`, `name T` or `name *T`
fn receiver_type<'s>(receiver: &TokenTree, source: &'s str) -> Option<&'s str> {
    let params = split_on(receiver.children(), Token::Comma);
    let [param] = params.as_slice() else {
        return None;
    };

    let ty = match strip_type_arguments(param) {
        [ty] => ty,
        [prefix, ty] if prefix.is_leaf(Token::Star) || prefix.is_leaf(Token::Ident) => ty,
        [name, star, ty] if name.is_leaf(Token::Ident) && star.is_leaf(Token::Star) => ty,
        _ => return None,
    };
    ty.ident(source)
}

/// `T` or `*T` with optional type arguments
fn named_type<'s>(trees: &[TokenTree], source: &'s str) -> Option<&'s str> {
    match strip_type_arguments(trees) {
        [ty] => ty.ident(source),
        [star, ty] if star.is_leaf(Token::Star) => ty.ident(source),
        _ => None,
    }
}

/// The first result type of a receiver-less function that names a known type
fn constructed_type<'s>(
    signature: &[TokenTree],
    source: &'s str,
    known_types: &HashSet<String>,
) -> Option<&'s str> {
    let mut rest = signature;
    if let Some((first, tail)) = rest.split_first() {
        if first.is_group(Delimiter::Bracket) {
            rest = tail;
        }
    }

    let (params, mut results) = rest.split_first()?;
    if !params.is_group(Delimiter::Paren) {
        return None;
    }
    if let Some((last, init)) = results.split_last() {
        let literal_type = init
            .last()
            .is_some_and(|tree| tree.is_leaf(Token::Struct) || tree.is_leaf(Token::Interface));
        if last.is_group(Delimiter::Brace) && !literal_type {
            results = init;
        }
    }

    let candidates: Vec<&[TokenTree]> = match results {
        [] => return None,
        [list] if list.is_group(Delimiter::Paren) => result_types(list.children()),
        _ => vec![results],
    };

    candidates
        .into_iter()
        .filter_map(|candidate| named_type(candidate, source))
        .find(|name| known_types.contains(*name))
}

/// Types of a parenthesized result list, with result names stripped
fn result_types(children: &[TokenTree]) -> Vec<&[TokenTree]> {
    let parts = split_on(children, Token::Comma);
    if parts.iter().any(|part| is_named_result(part)) {
        parts
            .into_iter()
            .filter(|part| part.len() >= 2)
            .map(|part| &part[1..])
            .collect()
    } else {
        parts
    }
}

/// `err error`, `f *Foo`; but not `pkg.Type` or `Stack[T]`
fn is_named_result(part: &[TokenTree]) -> bool {
    match part {
        [name, second, ..] => {
            name.is_leaf(Token::Ident)
                && !second.is_leaf(Token::Dot)
                && !(part.len() == 2 && second.is_group(Delimiter::Bracket))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(decls: &[Declaration]) -> Vec<&str> {
        decls.iter().map(|decl| decl.name.as_str()).collect()
    }

    fn grouped_names<'a>(map: &'a HashMap<String, Vec<Declaration>>, owner: &str) -> Vec<&'a str> {
        map.get(owner).map(|decls| names(decls)).unwrap_or_default()
    }

    #[test]
    fn test_doc_comments_are_attached() {
        let source = "package main\n\n// orphan\n\n// Foo doc\n// more\ntype Foo struct {\n\tx int\n}\n";
        let info = extract(source).unwrap();
        let foo = &info.types["Foo"];

        assert_eq!(foo.span, Span::new(5, 9));
        assert_eq!(foo.text, "// Foo doc\n// more\ntype Foo struct {\n\tx int\n}");
        assert_eq!(foo.category, Category::Type);
    }

    #[test]
    fn test_const_block_is_one_unit() {
        let source = "package main\n\nconst (\n\tA = 1\n\tB = 2\n)\n\nconst C = 3\n\nvar x, y = 1, 2\n";
        let info = extract(source).unwrap();

        assert_eq!(names(&info.constants), vec!["A", "C"]);
        assert_eq!(info.constants[0].members, vec!["A", "B"]);
        assert_eq!(info.constants[0].text, "const (\n\tA = 1\n\tB = 2\n)");
        assert_eq!(info.variables[0].members, vec!["x", "y"]);
    }

    #[test]
    fn test_empty_block_is_ignored() {
        let info = extract("package main\n\nvar ()\n").unwrap();
        assert!(info.variables.is_empty());
    }

    #[test]
    fn test_interfaces_and_types() {
        let source = "package main

type Reader interface {
	Read() error
}

type ID int

type Alias = string

type List[T any] struct {
	items []T
}

type Constraint[T any] interface {
	~int | ~string
}

type Matrix [4]interface{}

type Scaled [N*2]interface{ M() }

type Qualified [pkg.N]interface{}

type Pair[K, V comparable] interface{ Key() K }
";
        let info = extract(source).unwrap();

        assert_eq!(info.interface_names, vec!["Reader", "Constraint", "Pair"]);
        assert_eq!(
            info.type_names,
            vec!["ID", "Alias", "List", "Matrix", "Scaled", "Qualified"]
        );
        assert_eq!(info.interfaces["Reader"].category, Category::Interface);
    }

    #[test]
    fn test_grouped_types() {
        let source = "package main

type (
	A struct{}
	B int
)

type (
	I interface{}
	J interface{}
)

func NewB() B { return 0 }

func (a A) M() {}
";
        let info = extract(source).unwrap();

        assert_eq!(info.type_names, vec!["A"]);
        assert_eq!(info.types["A"].members, vec!["A", "B"]);
        assert_eq!(info.interface_names, vec!["I"]);
        assert_eq!(grouped_names(&info.constructors, "B"), vec!["NewB"]);
        assert_eq!(grouped_names(&info.methods, "A"), vec!["M"]);
    }

    #[test]
    fn test_methods_by_receiver_shape() {
        let source = "package main

type Foo struct{}

type Stack[T any] struct{}

func (f *Foo) Pointer() {}
func (f Foo) Value() {}
func (*Foo) Anonymous() {}
func (Foo) Bare() {}
func (s *Stack[T]) Push(v T) {}
func () Empty() {}
func (a, b Foo) Twice() {}
";
        let info = extract(source).unwrap();

        assert_eq!(
            grouped_names(&info.methods, "Foo"),
            vec!["Pointer", "Value", "Anonymous", "Bare"]
        );
        assert_eq!(grouped_names(&info.methods, "Stack"), vec!["Push"]);
        assert!(info.functions.is_empty());
    }

    #[test]
    fn test_method_of_unknown_type_is_kept() {
        let source = "package main\n\nfunc (b *Bar) M() {}\n";
        let info = extract(source).unwrap();
        assert_eq!(grouped_names(&info.methods, "Bar"), vec!["M"]);
        assert!(info.types.is_empty());
    }

    #[test]
    fn test_constructor_heuristic() {
        let source = "package main

func NewFoo() *Foo { return nil }

func MakeFoo() (Foo, error) { return Foo{}, nil }

func Named() (f *Foo, err error) { return }

func Other() *Bar { return nil }

func Qualified() pkg.Foo { return nil }

func Closure() func() *Foo { return nil }

type Foo struct{}
";
        let info = extract(source).unwrap();

        assert_eq!(
            grouped_names(&info.constructors, "Foo"),
            vec!["NewFoo", "MakeFoo", "Named"]
        );
        assert_eq!(names(&info.functions), vec!["Other", "Qualified", "Closure"]);
    }

    #[test]
    fn test_interface_is_not_constructed() {
        let source = "package main\n\ntype R interface{}\n\nfunc NewR() R { return nil }\n";
        let info = extract(source).unwrap();
        assert_eq!(names(&info.functions), vec!["NewR"]);
    }

    #[test]
    fn test_functions_keep_duplicates() {
        let source = "package main\n\nfunc init() {}\n\nfunc main() {}\n\nfunc init() {}\n";
        let info = extract(source).unwrap();
        assert_eq!(names(&info.functions), vec!["init", "main", "init"]);
    }

    #[test]
    fn test_declarations_sharing_lines_stay() {
        let source = "package main\n\nvar a = 1; var b = 2\n\nvar c = 3\n";
        let info = extract(source).unwrap();
        assert_eq!(names(&info.variables), vec!["c"]);
    }

    #[test]
    fn test_imports_are_not_declarations() {
        let source = "package main\n\nimport \"fmt\"\n\n// doc\nfunc main() { fmt.Println() }\n";
        let info = extract(source).unwrap();
        assert_eq!(info.functions[0].span, Span::new(5, 6));
    }

    #[test]
    fn test_parse_error() {
        let error = extract("package main\n\nfunc main() {\n").unwrap_err();
        assert_eq!(error.message, "unexpected end of file");
    }
}
