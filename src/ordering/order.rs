//! Category ordering
//!
//! An order is a list of [Order] tokens. Callers usually name only the categories they care
//! about; [OrderPlanner::resolve] completes the list with the missing default categories, in
//! default relative order. `init` and `main` are not default categories: those functions are
//! sorted with the other functions unless their token is requested explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Const,
    Var,
    Interface,
    Type,
    Func,
    Init,
    Main,
}

impl Order {
    pub const ALL: [Order; 7] = [
        Order::Const,
        Order::Var,
        Order::Interface,
        Order::Type,
        Order::Func,
        Order::Init,
        Order::Main,
    ];

    /// `const, var, interface, type, func`
    pub const DEFAULT: [Order; 5] = [
        Order::Const,
        Order::Var,
        Order::Interface,
        Order::Type,
        Order::Func,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Order::Const => "const",
            Order::Var => "var",
            Order::Interface => "interface",
            Order::Type => "type",
            Order::Func => "func",
            Order::Init => "init",
            Order::Main => "main",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order `{0}`, expected one of: const, var, interface, type, func, init, main")]
pub struct UnknownOrder(pub String);

impl FromStr for Order {
    type Err = UnknownOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Order::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| UnknownOrder(s.to_string()))
    }
}

/// A complete category order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOrder {
    pub sequence: Vec<Order>,
    /// `init` functions are placed at their own token instead of with the other functions
    pub extract_init: bool,
    /// Same for `main`
    pub extract_main: bool,
}

impl fmt::Display for ResolvedOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<&str> = self.sequence.iter().map(|order| order.as_str()).collect();
        f.write_str(&tokens.join(","))
    }
}

/// Completes requested orders against a set of default categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlanner {
    defaults: Vec<Order>,
}

impl OrderPlanner {
    pub fn new(defaults: impl Into<Vec<Order>>) -> Self {
        Self {
            defaults: defaults.into(),
        }
    }

    pub fn defaults(&self) -> &[Order] {
        &self.defaults
    }

    /// Requested tokens first, keeping the first occurrence of repeats, then the missing
    /// defaults. No request, or an empty one, yields the defaults.
    pub fn resolve(&self, requested: Option<&[Order]>) -> ResolvedOrder {
        let mut sequence: Vec<Order> = Vec::with_capacity(Order::ALL.len());
        for order in requested
            .unwrap_or_default()
            .iter()
            .chain(self.defaults.iter())
        {
            if !sequence.contains(order) {
                sequence.push(*order);
            }
        }

        ResolvedOrder {
            extract_init: sequence.contains(&Order::Init),
            extract_main: sequence.contains(&Order::Main),
            sequence,
        }
    }
}

impl Default for OrderPlanner {
    fn default() -> Self {
        Self::new(Order::DEFAULT)
    }
}
