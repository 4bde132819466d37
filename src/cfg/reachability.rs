//! Reachability analysis for flow graphs
//!
//! Code after a `return` is kept in the graph but has no incoming edges;
//! these queries tell it apart from live code.

use crate::cfg::analysis::find_start;
use crate::cfg::{FlowGraph, NodeId};
use petgraph::graph::NodeIndex;
use petgraph::visit::Dfs;
use std::collections::BTreeSet;

/// Find all nodes reachable from Start, in id order
///
/// For graphs without a Start node, returns an empty vec.
pub fn find_reachable(graph: &FlowGraph) -> Vec<NodeId> {
    let Some(start) = find_start(graph) else {
        return vec![];
    };

    let inner = graph.graph();
    let mut dfs = Dfs::new(inner, NodeIndex::new(start));
    let mut reachable = BTreeSet::new();
    while let Some(node) = dfs.next(inner) {
        reachable.insert(node.index());
    }

    reachable.into_iter().collect()
}

/// Find all nodes unreachable from Start, in id order
///
/// Returns an empty vec if the graph has no Start node or everything is
/// reachable.
pub fn find_unreachable(graph: &FlowGraph) -> Vec<NodeId> {
    if find_start(graph).is_none() {
        return vec![];
    }

    let reachable: BTreeSet<_> = find_reachable(graph).into_iter().collect();
    graph
        .nodes()
        .map(|n| n.id)
        .filter(|id| !reachable.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::build_flow_graph;
    use crate::predicate::{PredicateExpr, RelOp};
    use crate::program::Stmt;

    #[test]
    fn test_all_reachable() {
        let g = build_flow_graph(&[Stmt::if_else(
            PredicateExpr::cmp("x", RelOp::Gt, 0),
            vec![Stmt::ret("1")],
            vec![Stmt::ret("0")],
        )]);
        assert_eq!(find_reachable(&g), vec![0, 1, 2, 3, 4, 5]);
        assert!(find_unreachable(&g).is_empty());
    }

    #[test]
    fn test_dead_code_after_return() {
        let g = build_flow_graph(&[
            Stmt::ret("0"),
            Stmt::simple("log();"),
            Stmt::simple("cleanup();"),
        ]);
        // Start, return 0 | log(), cleanup(), End
        assert_eq!(find_reachable(&g), vec![0, 1]);
        assert_eq!(find_unreachable(&g), vec![2, 3, 4]);
    }

    #[test]
    fn test_empty_graph() {
        let g = FlowGraph::default();
        assert!(find_reachable(&g).is_empty());
        assert!(find_unreachable(&g).is_empty());
    }
}
