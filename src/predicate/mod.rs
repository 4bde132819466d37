//! Predicate model for branch conditions
//!
//! A branch condition is an immutable tree of relational atoms joined by
//! `&&`, `||` and `!`. Anything outside that grammar (function calls,
//! arithmetic, pointer reads) is kept as [`PredicateExpr::Opaque`] so the
//! rest of the pipeline can degrade instead of failing.

pub mod decompose;
pub mod eval;

pub use decompose::{extract_target, flatten, AtomTarget};
pub use eval::{evaluate, Truth};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Variable name to integer value
///
/// Ordered so iteration, hashing and equality are deterministic.
pub type Assignment = BTreeMap<String, i64>;

/// One side of a relational comparison
///
/// Serialized untagged: JSON integers are constants, strings are variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Const(i64),
    Var(String),
}

impl Operand {
    /// Variable operand
    pub fn var(name: impl Into<String>) -> Self {
        Operand::Var(name.into())
    }

    /// Integer literal operand
    pub fn constant(value: i64) -> Self {
        Operand::Const(value)
    }

    /// Variable name, if this operand is one
    pub fn as_var(&self) -> Option<&str> {
        match self {
            Operand::Var(name) => Some(name),
            Operand::Const(_) => None,
        }
    }

    /// Literal value, if this operand is one
    pub fn as_const(&self) -> Option<i64> {
        match self {
            Operand::Const(value) => Some(*value),
            Operand::Var(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Const(value) => write!(f, "{}", value),
            Operand::Var(name) => f.write_str(name),
        }
    }
}

/// Relational operator of an atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelOp {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl RelOp {
    /// Apply the operator to two integers
    pub fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            RelOp::Gt => lhs > rhs,
            RelOp::Ge => lhs >= rhs,
            RelOp::Lt => lhs < rhs,
            RelOp::Le => lhs <= rhs,
            RelOp::Eq => lhs == rhs,
            RelOp::Ne => lhs != rhs,
        }
    }

    /// Operator with its operands swapped (`a < b` is `b > a`)
    pub fn mirrored(self) -> Self {
        match self {
            RelOp::Gt => RelOp::Lt,
            RelOp::Ge => RelOp::Le,
            RelOp::Lt => RelOp::Gt,
            RelOp::Le => RelOp::Ge,
            RelOp::Eq => RelOp::Eq,
            RelOp::Ne => RelOp::Ne,
        }
    }

    /// Source form of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Single relational comparison (`left op right`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    pub left: Operand,
    pub op: RelOp,
    pub right: Operand,
}

impl Atom {
    pub fn new(left: Operand, op: RelOp, right: Operand) -> Self {
        Self { left, op, right }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.op, self.right)
    }
}

/// Boolean condition tree
///
/// Built once by the external parser and never mutated. Children are
/// boxed, so the tree has no back-references and cannot be cyclic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredicateExpr {
    /// Single relational comparison
    Atom(Atom),
    /// `left && right`
    And {
        left: Box<PredicateExpr>,
        right: Box<PredicateExpr>,
    },
    /// `left || right`
    Or {
        left: Box<PredicateExpr>,
        right: Box<PredicateExpr>,
    },
    /// `!inner`
    Not { inner: Box<PredicateExpr> },
    /// Construct outside the grammar; `text` is for display only
    Opaque {
        #[serde(default)]
        text: String,
    },
}

impl PredicateExpr {
    pub fn atom(left: Operand, op: RelOp, right: Operand) -> Self {
        PredicateExpr::Atom(Atom::new(left, op, right))
    }

    /// `var op constant`, the common shape of a branch atom
    pub fn cmp(var: &str, op: RelOp, constant: i64) -> Self {
        PredicateExpr::atom(Operand::var(var), op, Operand::constant(constant))
    }

    pub fn and(left: PredicateExpr, right: PredicateExpr) -> Self {
        PredicateExpr::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: PredicateExpr, right: PredicateExpr) -> Self {
        PredicateExpr::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(inner: PredicateExpr) -> Self {
        PredicateExpr::Not {
            inner: Box::new(inner),
        }
    }

    pub fn opaque(text: impl Into<String>) -> Self {
        PredicateExpr::Opaque { text: text.into() }
    }
}

/// Textual form used for Branch node labels: every binary node is
/// parenthesized, negation is prefixed (`!(x > 0)`).
impl fmt::Display for PredicateExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateExpr::Atom(atom) => fmt::Display::fmt(atom, f),
            PredicateExpr::And { left, right } => write!(f, "({} && {})", left, right),
            PredicateExpr::Or { left, right } => write!(f, "({} || {})", left, right),
            PredicateExpr::Not { inner } => write!(f, "!{}", inner),
            PredicateExpr::Opaque { text } if text.is_empty() => f.write_str("<opaque>"),
            PredicateExpr::Opaque { text } => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relop_apply() {
        assert!(RelOp::Gt.apply(6, 5));
        assert!(!RelOp::Gt.apply(5, 5));
        assert!(RelOp::Ge.apply(5, 5));
        assert!(RelOp::Lt.apply(4, 5));
        assert!(RelOp::Le.apply(5, 5));
        assert!(RelOp::Eq.apply(0, 0));
        assert!(RelOp::Ne.apply(1, 0));
    }

    #[test]
    fn test_relop_mirrored_preserves_meaning() {
        let ops = [RelOp::Gt, RelOp::Ge, RelOp::Lt, RelOp::Le, RelOp::Eq, RelOp::Ne];
        for op in ops {
            for (a, b) in [(1, 2), (2, 2), (3, 2)] {
                assert_eq!(op.apply(a, b), op.mirrored().apply(b, a), "{} {} {}", a, op, b);
            }
        }
    }

    #[test]
    fn test_display_nested() {
        let expr = PredicateExpr::and(
            PredicateExpr::cmp("x", RelOp::Gt, 0),
            PredicateExpr::not(PredicateExpr::cmp("y", RelOp::Eq, 0)),
        );
        assert_eq!(expr.to_string(), "((x > 0) && !(y == 0))");
    }

    #[test]
    fn test_display_opaque() {
        assert_eq!(PredicateExpr::opaque("check(x)").to_string(), "check(x)");
        assert_eq!(PredicateExpr::opaque("").to_string(), "<opaque>");
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"kind":"atom","left":"x","op":">=","right":10}"#;
        let expr: PredicateExpr = serde_json::from_str(json).unwrap();
        assert_eq!(expr, PredicateExpr::cmp("x", RelOp::Ge, 10));

        let back = serde_json::to_string(&expr).unwrap();
        assert_eq!(back, json);
    }
}
