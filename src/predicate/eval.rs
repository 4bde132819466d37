//! Three-valued evaluation of condition trees

use crate::predicate::{Assignment, Atom, Operand, PredicateExpr};
use serde::{Deserialize, Serialize};

/// Outcome of evaluating a condition against a partial assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    /// Kleene conjunction: any `False` decides, otherwise `Unknown` spreads
    pub fn and(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown,
        }
    }

    /// Kleene disjunction: any `True` decides, otherwise `Unknown` spreads
    pub fn or(self, other: Truth) -> Truth {
        match (self, other) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown,
        }
    }

    /// Negation; `Unknown` stays `Unknown`
    pub fn negate(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }

    /// Check if the outcome is decided
    pub fn is_known(self) -> bool {
        !matches!(self, Truth::Unknown)
    }

    /// Collapse to `Option<bool>`, `None` for `Unknown`
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Truth::True => Some(true),
            Truth::False => Some(false),
            Truth::Unknown => None,
        }
    }
}

impl From<bool> for Truth {
    fn from(value: bool) -> Self {
        if value {
            Truth::True
        } else {
            Truth::False
        }
    }
}

/// Evaluate `expr` against a (possibly partial) assignment
///
/// Variables missing from `inputs` make their atom `Unknown`. Both operands
/// of `&&`/`||` are evaluated, and a decisive side settles the result even
/// when the other side is `Unknown`. Opaque nodes are always `Unknown`.
/// Never fails.
pub fn evaluate(expr: &PredicateExpr, inputs: &Assignment) -> Truth {
    match expr {
        PredicateExpr::Atom(atom) => evaluate_atom(atom, inputs),
        PredicateExpr::And { left, right } => evaluate(left, inputs).and(evaluate(right, inputs)),
        PredicateExpr::Or { left, right } => evaluate(left, inputs).or(evaluate(right, inputs)),
        PredicateExpr::Not { inner } => evaluate(inner, inputs).negate(),
        PredicateExpr::Opaque { .. } => Truth::Unknown,
    }
}

fn evaluate_atom(atom: &Atom, inputs: &Assignment) -> Truth {
    match (resolve(&atom.left, inputs), resolve(&atom.right, inputs)) {
        (Some(lhs), Some(rhs)) => atom.op.apply(lhs, rhs).into(),
        _ => Truth::Unknown,
    }
}

fn resolve(operand: &Operand, inputs: &Assignment) -> Option<i64> {
    match operand {
        Operand::Const(value) => Some(*value),
        Operand::Var(name) => inputs.get(name).copied(),
    }
}
