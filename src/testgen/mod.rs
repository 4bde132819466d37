//! Test input synthesis
//!
//! Produces a deduplicated, ordered list of input assignments for one
//! function: a baseline (C0) plus, for every atomic comparison of every
//! branch condition, one assignment driving it true and one driving it
//! false (C1, MC/DC-like).
//!
//! Atoms that cannot be resolved to a parameter, and conditions with no
//! atoms at all, fall back to perturbing every parameter by `+1` so the
//! branch is never silently dropped.

pub mod boundary;

pub use boundary::suggest;

use crate::predicate::{extract_target, flatten, Assignment, AtomTarget, PredicateExpr};
use crate::program::FunctionSignature;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Reason attached to the all-zero case in C1 mode
pub const BASELINE_REASON: &str = "baseline";

/// Reason attached to the all-zero case in C0 mode
pub const C0_BASELINE_REASON: &str = "C0 baseline";

/// One synthesized input assignment
///
/// Identity is the assignment alone; `reason` is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub inputs: Assignment,
    pub reason: String,
}

impl TestCase {
    pub fn new(inputs: Assignment, reason: impl Into<String>) -> Self {
        Self {
            inputs,
            reason: reason.into(),
        }
    }

    /// Value of one input (all parameters are present)
    pub fn get(&self, name: &str) -> Option<i64> {
        self.inputs.get(name).copied()
    }
}

/// Test generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CoverageMode {
    /// Baseline only
    C0,
    /// Baseline plus both truth values of every atom
    #[default]
    C1,
}

impl fmt::Display for CoverageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageMode::C0 => f.write_str("C0 (baseline)"),
            CoverageMode::C1 => f.write_str("C1 (atomic conditions True/False, MC/DC-like)"),
        }
    }
}

/// Generate test cases using the given strategy
pub fn generate(
    signature: &FunctionSignature,
    roots: &[&PredicateExpr],
    mode: CoverageMode,
) -> Vec<TestCase> {
    match mode {
        CoverageMode::C0 => baseline_only(signature),
        CoverageMode::C1 => synthesize(signature, roots),
    }
}

/// C0: the single all-zero case
pub fn baseline_only(signature: &FunctionSignature) -> Vec<TestCase> {
    vec![TestCase::new(signature.baseline(), C0_BASELINE_REASON)]
}

/// C1: baseline plus per-atom true/false cases
///
/// `roots` holds one condition per branch point in source order. The
/// result is never empty: the baseline always comes first.
pub fn synthesize(signature: &FunctionSignature, roots: &[&PredicateExpr]) -> Vec<TestCase> {
    let base = signature.baseline();
    let mut cases = CaseSet::default();
    cases.push(base.clone(), BASELINE_REASON.to_string());

    for root in roots {
        let atoms = flatten(root);
        tracing::debug!(function = %signature.name, condition = %root, atoms = atoms.len(), "synthesizing");

        if atoms.is_empty() {
            perturb_all(signature, &base, &mut cases, |param| {
                format!("vary {} (no primitive cmp)", param)
            });
            continue;
        }

        for atom in atoms {
            let target = extract_target(atom);
            match target.var.as_deref() {
                Some(var) if signature.has_param(var) => {
                    drive_atom(var, &target, &base, &mut cases);
                }
                _ => {
                    tracing::trace!(atom = %atom, "atom not resolvable to a parameter");
                    perturb_all(signature, &base, &mut cases, |param| {
                        format!("vary {} for {}", param, target.op)
                    });
                }
            }
        }
    }

    tracing::debug!(function = %signature.name, cases = cases.len(), "synthesized test cases");
    cases.into_vec()
}

/// Emit the first candidate making the atom true, then the first making it false
fn drive_atom(var: &str, target: &AtomTarget, base: &Assignment, cases: &mut CaseSet) {
    let candidates = suggest(target.op, target.constant);
    let pick = |want: bool| {
        candidates
            .iter()
            .copied()
            .find(|&c| target.truth_at(c) == Some(want))
    };

    for (want, label) in [(true, "True"), (false, "False")] {
        if let Some(value) = pick(want) {
            let mut inputs = base.clone();
            inputs.insert(var.to_string(), value);
            cases.push(inputs, format!("{} -> {} ({})", target.describe(), label, value));
        }
    }
}

/// One case per parameter, that parameter bumped by one from baseline
fn perturb_all(
    signature: &FunctionSignature,
    base: &Assignment,
    cases: &mut CaseSet,
    reason: impl Fn(&str) -> String,
) {
    for param in signature.param_names() {
        let mut inputs = base.clone();
        if let Some(value) = inputs.get_mut(param) {
            *value += 1;
        }
        cases.push(inputs, reason(param));
    }
}

/// Insertion-ordered set of cases keyed by their assignment
#[derive(Default)]
struct CaseSet {
    cases: Vec<TestCase>,
    seen: HashSet<Assignment>,
}

impl CaseSet {
    /// Keep the first case seen for an assignment, drop later duplicates
    fn push(&mut self, inputs: Assignment, reason: String) {
        if self.seen.insert(inputs.clone()) {
            self.cases.push(TestCase::new(inputs, reason));
        }
    }

    fn len(&self) -> usize {
        self.cases.len()
    }

    fn into_vec(self) -> Vec<TestCase> {
        self.cases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{Operand, RelOp};
    use crate::program::Param;

    fn sig(params: &[&str]) -> FunctionSignature {
        FunctionSignature::new("f", params.iter().map(|p| Param::int(*p)).collect())
    }

    fn find<'a>(cases: &'a [TestCase], reason: &str) -> Option<&'a TestCase> {
        cases.iter().find(|c| c.reason == reason)
    }

    #[test]
    fn test_baseline_first() {
        let cases = synthesize(&sig(&["x", "y"]), &[]);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].reason, "baseline");
        assert_eq!(cases[0].get("x"), Some(0));
        assert_eq!(cases[0].get("y"), Some(0));
    }

    #[test]
    fn test_baseline_without_params() {
        let cases = synthesize(&sig(&[]), &[]);
        assert_eq!(cases.len(), 1);
        assert!(cases[0].inputs.is_empty());
    }

    #[test]
    fn test_atom_true_and_false() {
        let cond = PredicateExpr::cmp("x", RelOp::Gt, 5);
        let cases = synthesize(&sig(&["x"]), &[&cond]);

        let t = find(&cases, "x > 5 -> True (6)").unwrap();
        assert_eq!(t.get("x"), Some(6));
        let f = find(&cases, "x > 5 -> False (4)").unwrap();
        assert_eq!(f.get("x"), Some(4));
        assert_eq!(cases.len(), 3);
    }

    #[test]
    fn test_equality_atom_dedups_against_baseline() {
        // y == 0 is already true at baseline, so only the false case is new
        let cond = PredicateExpr::cmp("y", RelOp::Eq, 0);
        let cases = synthesize(&sig(&["x", "y"]), &[&cond]);
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].reason, "baseline");
        assert_eq!(cases[1].reason, "y == 0 -> False (1)");
        assert_eq!(cases[1].get("y"), Some(1));
        assert_eq!(cases[1].get("x"), Some(0));
    }

    #[test]
    fn test_no_atoms_perturbs_every_param() {
        let cond = PredicateExpr::opaque("is_ready()");
        let cases = synthesize(&sig(&["a", "b"]), &[&cond]);
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[1].reason, "vary a (no primitive cmp)");
        assert_eq!(cases[1].get("a"), Some(1));
        assert_eq!(cases[1].get("b"), Some(0));
        assert_eq!(cases[2].reason, "vary b (no primitive cmp)");
        assert_eq!(cases[2].get("b"), Some(1));
    }

    #[test]
    fn test_unknown_variable_perturbs_every_param() {
        let cond = PredicateExpr::cmp("g_limit", RelOp::Lt, 3);
        let cases = synthesize(&sig(&["a", "b"]), &[&cond]);
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[1].reason, "vary a for <");
        assert_eq!(cases[2].reason, "vary b for <");
    }

    #[test]
    fn test_var_vs_var_emits_nothing_extra() {
        let cond = PredicateExpr::atom(Operand::var("a"), RelOp::Lt, Operand::var("b"));
        let cases = synthesize(&sig(&["a", "b"]), &[&cond]);
        assert_eq!(cases.len(), 1);
    }

    #[test]
    fn test_constant_on_left() {
        let cond = PredicateExpr::atom(Operand::constant(10), RelOp::Le, Operand::var("t"));
        let cases = synthesize(&sig(&["t"]), &[&cond]);
        // 10 <= t is t >= 10: candidates 9, 10, 11
        assert_eq!(cases[1].reason, "t >= 10 -> True (10)");
        assert_eq!(cases[2].reason, "t >= 10 -> False (9)");
    }

    #[test]
    fn test_duplicate_atoms_across_roots() {
        let a = PredicateExpr::cmp("x", RelOp::Gt, 0);
        let b = PredicateExpr::or(PredicateExpr::cmp("x", RelOp::Gt, 0), PredicateExpr::opaque("f()"));
        let once = synthesize(&sig(&["x"]), &[&a]);
        let twice = synthesize(&sig(&["x"]), &[&a, &b]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_first_reason_wins_on_duplicate() {
        let a = PredicateExpr::cmp("x", RelOp::Ge, 1);
        let b = PredicateExpr::cmp("x", RelOp::Gt, 0);
        let cases = synthesize(&sig(&["x"]), &[&a, &b]);
        // x=1 appears first as "x >= 1 -> True (1)"
        let one: Vec<_> = cases.iter().filter(|c| c.get("x") == Some(1)).collect();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].reason, "x >= 1 -> True (1)");
    }

    #[test]
    fn test_generate_c0() {
        let cond = PredicateExpr::cmp("x", RelOp::Gt, 5);
        let cases = generate(&sig(&["x"]), &[&cond], CoverageMode::C0);
        assert_eq!(cases, vec![TestCase::new(sig(&["x"]).baseline(), "C0 baseline")]);
    }

    #[test]
    fn test_generate_c1_matches_synthesize() {
        let cond = PredicateExpr::cmp("x", RelOp::Ne, 2);
        let s = sig(&["x"]);
        assert_eq!(generate(&s, &[&cond], CoverageMode::C1), synthesize(&s, &[&cond]));
    }
}
