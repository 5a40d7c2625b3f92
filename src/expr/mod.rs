//! Expression language for feature conditions, computed flags, and template actions.
//!
//! Expressions are parsed once into a typed [`Expr`] tree and evaluated by
//! recursive descent against a flat [`Env`] symbol table:
//!
//! ```text
//! "Go" in langs
//! go and not (python || rust)
//! .license == "MIT"
//! ```
//!
//! The same evaluator backs file-level FeatureRules and content-level
//! `{{ if ... }}` blocks so both behave identically.

mod eval;
mod lexer;
mod parser;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub use eval::{eval, eval_bool};
pub use parser::parse;

/// Flat symbol table of answers and computed flags.
pub type Env = BTreeMap<String, Value>;

/// A value bound to an answer or computed flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Str(String),
    List(Vec<String>),
}

impl Value {
    /// Truthiness used by conditions: `false`, `""` and `[]` are false.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    /// Scalar string form. Lists have none; they must be iterated.
    pub fn as_scalar(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Str(s) => Some(s.clone()),
            Value::List(_) => None,
        }
    }

    /// Short type name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => write!(f, "{:?}", items),
        }
    }
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(Value),
    Ref(String),
    /// The current element inside a `range` block.
    Dot,
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Contains {
        needle: Box<Expr>,
        haystack: Box<Expr>,
    },
    Eq(Box<Expr>, Box<Expr>),
    Ne(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Every name this expression references, in source order, with duplicates.
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_refs(&mut names);
        names
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Literal(_) | Expr::Dot => {}
            Expr::Ref(name) => out.push(name),
            Expr::Not(inner) => inner.collect_refs(out),
            Expr::And(a, b) | Expr::Or(a, b) | Expr::Eq(a, b) | Expr::Ne(a, b) => {
                a.collect_refs(out);
                b.collect_refs(out);
            }
            Expr::Contains { needle, haystack } => {
                needle.collect_refs(out);
                haystack.collect_refs(out);
            }
        }
    }

    /// Whether the expression uses `.` (only legal inside a range block).
    pub fn uses_dot(&self) -> bool {
        match self {
            Expr::Dot => true,
            Expr::Literal(_) | Expr::Ref(_) => false,
            Expr::Not(inner) => inner.uses_dot(),
            Expr::And(a, b) | Expr::Or(a, b) | Expr::Eq(a, b) | Expr::Ne(a, b) => {
                a.uses_dot() || b.uses_dot()
            }
            Expr::Contains { needle, haystack } => needle.uses_dot() || haystack.uses_dot(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::Ref(name) => write!(f, "{}", name),
            Expr::Dot => write!(f, "."),
            Expr::Not(inner) => write!(f, "not {}", inner),
            Expr::And(a, b) => write!(f, "({} and {})", a, b),
            Expr::Or(a, b) => write!(f, "({} or {})", a, b),
            Expr::Contains { needle, haystack } => write!(f, "{} in {}", needle, haystack),
            Expr::Eq(a, b) => write!(f, "{} == {}", a, b),
            Expr::Ne(a, b) => write!(f, "{} != {}", a, b),
        }
    }
}

/// Evaluation scope: the symbol table plus the current `range` element, if any.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    vars: &'a Env,
    dot: Option<&'a str>,
}

impl<'a> Scope<'a> {
    pub fn new(vars: &'a Env) -> Self {
        Self { vars, dot: None }
    }

    /// A child scope with `.` bound to `item`.
    pub fn with_dot<'b>(&self, item: &'b str) -> Scope<'b>
    where
        'a: 'b,
    {
        Scope {
            vars: self.vars,
            dot: Some(item),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.vars.get(name)
    }

    pub fn dot(&self) -> Option<&'a str> {
        self.dot
    }
}

/// Syntax error while parsing an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprParseError {
    /// 1-based column in the expression source.
    pub column: usize,
    pub message: String,
}

impl fmt::Display for ExprParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at column {}", self.message, self.column)
    }
}

impl std::error::Error for ExprParseError {}

/// Runtime evaluation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("undefined name '{0}'")]
    Undefined(String),

    #[error("'.' used outside of a range block")]
    DotOutsideRange,

    #[error("cannot test membership in a {0} value")]
    InvalidMembership(&'static str),

    #[error("cannot range over '{name}': expected a list, found a {found} value")]
    NotIterable { name: String, found: &'static str },
}
