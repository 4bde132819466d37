//! Boundary value suggestions for relational atoms

use crate::predicate::RelOp;

/// Generic probe set used when an atom has no constant
pub const GENERIC_PROBES: [i64; 3] = [-1, 0, 1];

/// Candidate values likely to flip an atom `var op constant`
///
/// Ordered; the synthesizer takes the first candidate that realizes each
/// truth value. Ordering operators probe both sides of the boundary,
/// equality operators probe the constant and its successor.
pub fn suggest(op: RelOp, constant: Option<i64>) -> Vec<i64> {
    let Some(k) = constant else {
        return GENERIC_PROBES.to_vec();
    };
    match op {
        RelOp::Gt | RelOp::Ge | RelOp::Lt | RelOp::Le => {
            vec![k.saturating_sub(1), k, k.saturating_add(1)]
        }
        RelOp::Eq | RelOp::Ne => vec![k, k.saturating_add(1)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_without_constant() {
        assert_eq!(suggest(RelOp::Gt, None), vec![-1, 0, 1]);
        assert_eq!(suggest(RelOp::Eq, None), vec![-1, 0, 1]);
    }

    #[test]
    fn test_suggest_ordering_ops() {
        for op in [RelOp::Gt, RelOp::Ge, RelOp::Lt, RelOp::Le] {
            assert_eq!(suggest(op, Some(5)), vec![4, 5, 6]);
        }
    }

    #[test]
    fn test_suggest_equality_ops() {
        assert_eq!(suggest(RelOp::Eq, Some(0)), vec![0, 1]);
        assert_eq!(suggest(RelOp::Ne, Some(-3)), vec![-3, -2]);
    }

    #[test]
    fn test_suggest_flips_every_operator() {
        // Each candidate list realizes both truth values of its atom
        for op in [RelOp::Gt, RelOp::Ge, RelOp::Lt, RelOp::Le, RelOp::Eq, RelOp::Ne] {
            let values = suggest(op, Some(10));
            assert!(values.iter().any(|&v| op.apply(v, 10)), "{} has no true probe", op);
            assert!(values.iter().any(|&v| !op.apply(v, 10)), "{} has no false probe", op);
        }
    }

    #[test]
    fn test_suggest_saturates_at_extremes() {
        assert_eq!(suggest(RelOp::Lt, Some(i64::MIN))[0], i64::MIN);
        assert_eq!(suggest(RelOp::Eq, Some(i64::MAX)), vec![i64::MAX, i64::MAX]);
    }
}
