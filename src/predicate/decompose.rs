//! Decomposition of condition trees into atomic comparisons

use crate::predicate::{Atom, Operand, PredicateExpr, RelOp};

/// Collect every atom reachable from `expr`
///
/// Descends `&&`, `||` and `!` depth-first, left to right. Structurally
/// identical atoms are all kept; callers decide whether to deduplicate.
/// An opaque subtree contributes nothing, so a condition made only of
/// opaque constructs yields an empty list (not an error).
pub fn flatten(expr: &PredicateExpr) -> Vec<&Atom> {
    let mut atoms = Vec::new();
    collect_atoms(expr, &mut atoms);
    atoms
}

fn collect_atoms<'a>(expr: &'a PredicateExpr, atoms: &mut Vec<&'a Atom>) {
    match expr {
        PredicateExpr::Atom(atom) => atoms.push(atom),
        PredicateExpr::And { left, right } | PredicateExpr::Or { left, right } => {
            collect_atoms(left, atoms);
            collect_atoms(right, atoms);
        }
        PredicateExpr::Not { inner } => collect_atoms(inner, atoms),
        PredicateExpr::Opaque { .. } => {}
    }
}

/// An atom rewritten as "variable compared against constant"
///
/// `var` is `None` when neither side is a variable; `constant` is `None`
/// when the other side is not a literal (e.g. `x < y`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomTarget {
    pub var: Option<String>,
    pub constant: Option<i64>,
    pub op: RelOp,
}

impl AtomTarget {
    /// Truth of the atom alone with its variable set to `value`
    ///
    /// Returns `None` when there is no constant to compare against.
    pub fn truth_at(&self, value: i64) -> Option<bool> {
        self.constant.map(|k| self.op.apply(value, k))
    }

    /// Text used in test case reasons: `x > 5`, or `x > ?` without a constant
    pub fn describe(&self) -> String {
        let var = self.var.as_deref().unwrap_or("?");
        match self.constant {
            Some(k) => format!("{} {} {}", var, self.op, k),
            None => format!("{} {} ?", var, self.op),
        }
    }
}

/// Resolve an atom into variable/constant form
///
/// A literal on the left swaps sides and mirrors the operator, so `5 < x`
/// becomes `x > 5`.
pub fn extract_target(atom: &Atom) -> AtomTarget {
    match (&atom.left, &atom.right) {
        (Operand::Var(var), Operand::Const(k)) => AtomTarget {
            var: Some(var.clone()),
            constant: Some(*k),
            op: atom.op,
        },
        (Operand::Const(k), Operand::Var(var)) => AtomTarget {
            var: Some(var.clone()),
            constant: Some(*k),
            op: atom.op.mirrored(),
        },
        (Operand::Var(var), Operand::Var(_)) => AtomTarget {
            var: Some(var.clone()),
            constant: None,
            op: atom.op,
        },
        (Operand::Const(_), Operand::Const(_)) => AtomTarget {
            var: None,
            constant: None,
            op: atom.op,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gt(var: &str, k: i64) -> PredicateExpr {
        PredicateExpr::cmp(var, RelOp::Gt, k)
    }

    #[test]
    fn test_flatten_single_atom() {
        let expr = gt("x", 0);
        let atoms = flatten(&expr);
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].to_string(), "(x > 0)");
    }

    #[test]
    fn test_flatten_depth_first_left_to_right() {
        // (a > 1 || (b > 2 && !(c > 3))) && d > 4
        let expr = PredicateExpr::and(
            PredicateExpr::or(
                gt("a", 1),
                PredicateExpr::and(gt("b", 2), PredicateExpr::not(gt("c", 3))),
            ),
            gt("d", 4),
        );
        let names: Vec<_> = flatten(&expr)
            .iter()
            .filter_map(|a| a.left.as_var())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_flatten_keeps_duplicates() {
        let expr = PredicateExpr::or(gt("x", 0), gt("x", 0));
        assert_eq!(flatten(&expr).len(), 2);
    }

    #[test]
    fn test_flatten_opaque_is_empty() {
        assert!(flatten(&PredicateExpr::opaque("f(x)")).is_empty());
        let expr = PredicateExpr::not(PredicateExpr::and(
            PredicateExpr::opaque("f(x)"),
            PredicateExpr::opaque("g(y)"),
        ));
        assert!(flatten(&expr).is_empty());
    }

    #[test]
    fn test_flatten_skips_opaque_siblings() {
        let expr = PredicateExpr::and(PredicateExpr::opaque("f(x)"), gt("y", 2));
        assert_eq!(flatten(&expr).len(), 1);
    }

    #[test]
    fn test_extract_var_const() {
        let atom = Atom::new(Operand::var("x"), RelOp::Ge, Operand::constant(10));
        let target = extract_target(&atom);
        assert_eq!(target.var.as_deref(), Some("x"));
        assert_eq!(target.constant, Some(10));
        assert_eq!(target.op, RelOp::Ge);
    }

    #[test]
    fn test_extract_const_on_left_mirrors_op() {
        let atom = Atom::new(Operand::constant(5), RelOp::Lt, Operand::var("x"));
        let target = extract_target(&atom);
        assert_eq!(target.var.as_deref(), Some("x"));
        assert_eq!(target.op, RelOp::Gt);
        assert_eq!(target.truth_at(6), Some(true));
        assert_eq!(target.truth_at(5), Some(false));
    }

    #[test]
    fn test_extract_var_var_has_no_constant() {
        let atom = Atom::new(Operand::var("x"), RelOp::Lt, Operand::var("y"));
        let target = extract_target(&atom);
        assert_eq!(target.var.as_deref(), Some("x"));
        assert_eq!(target.constant, None);
        assert_eq!(target.truth_at(0), None);
        assert_eq!(target.describe(), "x < ?");
    }

    #[test]
    fn test_extract_const_const_has_no_var() {
        let atom = Atom::new(Operand::constant(1), RelOp::Eq, Operand::constant(1));
        let target = extract_target(&atom);
        assert_eq!(target.var, None);
        assert_eq!(target.constant, None);
    }
}
