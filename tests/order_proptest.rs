//! Property-based tests for order resolution and sorting

use std::collections::BTreeSet;

use goreorder::{reorder_source, Order, OrderPlanner, ReorderConfig};
use proptest::prelude::*;

fn order_token() -> impl Strategy<Value = Order> {
    prop::sample::select(Order::ALL.to_vec())
}

/// Distinct identifiers that are never Go keywords nor `init`/`main`
fn identifiers() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("x[a-z0-9]{0,6}", 1..8)
        .prop_map(|names| names.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

fn reorder(source: &str) -> String {
    let config = ReorderConfig::for_source("prop.go", source);
    match reorder_source(&config) {
        Ok(content) => content,
        Err(failure) => panic!("reorder failed: {failure}\n{source}"),
    }
}

fn names_after<'a>(content: &'a str, prefix: &str) -> Vec<&'a str> {
    content
        .lines()
        .filter_map(|line| line.strip_prefix(prefix))
        .filter_map(|rest| rest.split(|c: char| c == '(' || c == ' ').next())
        .collect()
}

proptest! {
    #[test]
    fn resolved_order_is_complete(requested in prop::collection::vec(order_token(), 0..10)) {
        let planner = OrderPlanner::default();
        let resolved = planner.resolve(Some(&requested));

        for default in planner.defaults() {
            prop_assert!(resolved.sequence.contains(default));
        }
        let unique: BTreeSet<&str> = resolved.sequence.iter().map(|o| o.as_str()).collect();
        prop_assert_eq!(unique.len(), resolved.sequence.len());

        let mut first_seen: Vec<Order> = Vec::new();
        for order in &requested {
            if !first_seen.contains(order) {
                first_seen.push(*order);
            }
        }
        prop_assert_eq!(&resolved.sequence[..first_seen.len()], &first_seen[..]);
        prop_assert_eq!(resolved.extract_init, requested.contains(&Order::Init));
        prop_assert_eq!(resolved.extract_main, requested.contains(&Order::Main));
    }

    #[test]
    fn functions_come_out_sorted(names in identifiers()) {
        let mut source = String::from("package main\n");
        for name in &names {
            source.push_str(&format!("\nfunc {name}() {{\n\treturn\n}}\n"));
        }
        let content = reorder(&source);

        let mut expected: Vec<&str> = names.iter().map(String::as_str).collect();
        expected.sort();
        prop_assert_eq!(names_after(&content, "func "), expected);
        prop_assert_eq!(reorder(&content), content);
    }

    #[test]
    fn constants_and_variables_come_out_sorted(
        consts in identifiers(),
        vars in identifiers(),
    ) {
        let mut source = String::from("package main\n\n");
        for (index, name) in consts.iter().enumerate() {
            source.push_str(&format!("const {name} = {index}\n"));
            if let Some(var) = vars.get(index) {
                source.push_str(&format!("var {var}v = {index}\n"));
            }
        }
        for var in vars.iter().skip(consts.len()) {
            source.push_str(&format!("var {var}v = 0\n"));
        }
        let content = reorder(&source);

        let mut expected_consts: Vec<&str> = consts.iter().map(String::as_str).collect();
        expected_consts.sort();
        prop_assert_eq!(names_after(&content, "const "), expected_consts);

        let mut expected_vars: Vec<String> = vars.iter().map(|v| format!("{v}v")).collect();
        expected_vars.sort();
        prop_assert_eq!(names_after(&content, "var "), expected_vars);

        let last_const = content.rfind("\nconst ").unwrap();
        let first_var = content.find("\nvar ").unwrap();
        prop_assert!(last_const < first_var);
    }
}
