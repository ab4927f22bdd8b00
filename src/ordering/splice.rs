//! Splicing reordered declarations back into the source
//!
//! Every moved declaration is removed from its original lines and its text appended to a single
//! block, category by category in the resolved order. The block is inserted where the first
//! moved declaration used to start. Lines that were not moved, orphan comments included, keep
//! their relative order.
//!
//! Removed lines are tracked by index, so no placeholder text is ever written into the source.
//!
//! Within the block, fragments follow each other on consecutive lines, except that functions,
//! methods and constructors are separated from their neighbours by a blank line. Any further
//! separation is left to the formatter.

use tracing::debug;

use super::order::{Order, ResolvedOrder};
use super::types::{Declaration, ParsedInfo};

/// Reorder the declarations of `source` described by `info`
pub fn splice(source: &str, info: &ParsedInfo, plan: &ResolvedOrder, reorder_types: bool) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let mut splicer = Splicer::new(lines.len());

    for order in &plan.sequence {
        for decl in category_declarations(info, *order, plan, reorder_types) {
            splicer.take(decl);
        }
    }

    let Some(injection) = splicer.injection else {
        debug!(target: "goreorder::splice", "nothing to move");
        return source.to_string();
    };
    debug!(
        target: "goreorder::splice",
        injection_line = injection + 1,
        moved = splicer.moved,
        "spliced declarations"
    );

    let mut output: Vec<&str> = Vec::with_capacity(lines.len() + splicer.block.len());
    for (index, line) in lines.iter().enumerate() {
        if index == injection {
            output.extend(splicer.block.iter().copied());
        }
        if !splicer.removed[index] {
            output.push(line);
        }
    }
    output.join("\n")
}

struct Splicer<'a> {
    removed: Vec<bool>,
    block: Vec<&'a str>,
    injection: Option<usize>,
    last_was_function: bool,
    moved: usize,
}

impl<'a> Splicer<'a> {
    fn new(line_count: usize) -> Self {
        Self {
            removed: vec![false; line_count],
            block: Vec::new(),
            injection: None,
            last_was_function: false,
            moved: 0,
        }
    }

    fn take(&mut self, decl: &'a Declaration) {
        let lines = decl.span.line_indices();
        if lines.end > self.removed.len() || self.removed[lines.clone()].iter().any(|r| *r) {
            return;
        }
        self.removed[lines.clone()].fill(true);
        self.injection.get_or_insert(lines.start);

        let is_function = decl.category.is_function();
        if !self.block.is_empty() && (is_function || self.last_was_function) {
            self.block.push("");
        }
        self.block.push(&decl.text);
        self.last_was_function = is_function;
        self.moved += 1;
    }
}

/// Declarations of one order token, in emission order
fn category_declarations<'a>(
    info: &'a ParsedInfo,
    order: Order,
    plan: &ResolvedOrder,
    reorder_types: bool,
) -> Vec<&'a Declaration> {
    match order {
        Order::Const => sorted_by_name(info.constants.iter()),
        Order::Var => sorted_by_name(info.variables.iter()),
        Order::Interface => {
            sorted_by_name(info.interface_names.iter().filter_map(|name| info.interfaces.get(name)))
        }
        Order::Type => {
            let mut types: Vec<&Declaration> = info
                .type_names
                .iter()
                .filter_map(|name| info.types.get(name))
                .collect();
            if reorder_types {
                types.sort_by(|a, b| a.name.cmp(&b.name));
            }
            types
                .into_iter()
                .flat_map(|ty| {
                    let constructors = sorted_by_name(
                        ty.members
                            .iter()
                            .filter_map(|member| info.constructors.get(member))
                            .flatten(),
                    );
                    let methods = sorted_by_name(
                        ty.members
                            .iter()
                            .filter_map(|member| info.methods.get(member))
                            .flatten(),
                    );
                    std::iter::once(ty).chain(constructors).chain(methods)
                })
                .collect()
        }
        Order::Func => sorted_by_name(info.functions.iter().filter(|decl| {
            !(plan.extract_init && decl.name == "init" || plan.extract_main && decl.name == "main")
        })),
        Order::Init => info.functions_named("init").collect(),
        Order::Main => info.functions_named("main").collect(),
    }
}

fn sorted_by_name<'a>(decls: impl Iterator<Item = &'a Declaration>) -> Vec<&'a Declaration> {
    let mut decls: Vec<&Declaration> = decls.collect();
    decls.sort_by(|a, b| a.name.cmp(&b.name));
    decls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::extract::extract;
    use crate::ordering::order::OrderPlanner;

    fn run(source: &str, requested: Option<&[Order]>, reorder_types: bool) -> String {
        let info = extract(source).expect("source to parse");
        let plan = OrderPlanner::default().resolve(requested);
        splice(source, &info, &plan, reorder_types)
    }

    #[test]
    fn test_nothing_to_move() {
        let source = "package main\n\nimport \"fmt\"\n";
        assert_eq!(run(source, None, true), source);
    }

    #[test]
    fn test_categories_are_grouped_at_first_declaration() {
        let source = "package main\n\nvar a = 1\nconst c = 3\nvar b = 2\n";
        assert_eq!(
            run(source, Some(&[Order::Var, Order::Const]), false),
            "package main\n\nvar a = 1\nvar b = 2\nconst c = 3\n"
        );
        assert_eq!(
            run(source, None, false),
            "package main\n\nconst c = 3\nvar a = 1\nvar b = 2\n"
        );
    }

    #[test]
    fn test_type_followed_by_constructors_and_methods() {
        let source = "package main

func (f *Foo) Zed() {}

// Foo doc
type Foo struct{}

func (f *Foo) Alpha() {}

func NewFoo() *Foo { return nil }
";
        assert_eq!(
            run(source, None, false),
            "package main\n\n\n// Foo doc\ntype Foo struct{}\n\nfunc NewFoo() *Foo { return nil }\n\n\
             func (f *Foo) Alpha() {}\n\nfunc (f *Foo) Zed() {}\n\n\n"
        );
    }

    #[test]
    fn test_types_keep_discovery_order_unless_reordered() {
        let source = "package main\n\ntype b int\ntype a int\ntype c int\n";
        assert_eq!(run(source, None, false), source);
        assert_eq!(
            run(source, None, true),
            "package main\n\ntype a int\ntype b int\ntype c int\n"
        );
    }

    #[test]
    fn test_orphan_comments_stay() {
        let source = "package main

// orphan

func b() {}

// a doc
func a() {}
";
        assert_eq!(
            run(source, None, false),
            "package main\n\n// orphan\n\n\n// a doc\nfunc a() {}\n\nfunc b() {}\n"
        );
    }

    #[test]
    fn test_init_and_main_extraction() {
        let source = "package main\n\nfunc main() {}\nfunc b() {}\nfunc init() {}\nfunc a() {}\n";
        assert_eq!(
            run(source, Some(&[Order::Init, Order::Main]), false),
            "package main\n\nfunc init() {}\n\nfunc main() {}\n\nfunc a() {}\n\nfunc b() {}\n"
        );
        assert_eq!(
            run(source, None, false),
            "package main\n\nfunc a() {}\n\nfunc b() {}\n\nfunc init() {}\n\nfunc main() {}\n"
        );
    }

    #[test]
    fn test_unowned_methods_stay_in_place() {
        let source = "package main\n\nfunc (b *Bar) M() {}\n\nfunc a() {}\n";
        assert_eq!(run(source, None, false), source);
    }
}
