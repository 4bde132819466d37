//! Execution path prediction
//!
//! Walks a flow graph from Start for one input assignment. Branch nodes
//! are decided with the three-valued evaluator; when the outcome is
//! `Unknown` neither arm can be excluded, so both are followed. The
//! resulting edge set is what a presentation layer highlights.

use crate::cfg::analysis::find_start;
use crate::cfg::{EdgeLabel, FlowEdge, FlowGraph, NodeId, NodeKind};
use crate::predicate::{evaluate, Assignment, Truth};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Predicted path through a flow graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedPath {
    /// Visited `(from, to)` edge pairs
    pub edges: BTreeSet<(NodeId, NodeId)>,
    /// Visited nodes, Start included
    pub visited: BTreeSet<NodeId>,
    /// Outcome at each visited Branch node
    pub decisions: BTreeMap<NodeId, Truth>,
    /// BLAKE3 hash of the sorted edge set
    pub path_id: String,
}

impl PredictedPath {
    /// Check if the edge `from -> to` was taken
    pub fn contains_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.edges.contains(&(from, to))
    }

    /// Check if any branch was undecided
    pub fn is_ambiguous(&self) -> bool {
        self.decisions.values().any(|t| !t.is_known())
    }

    /// Visited nodes with no successors (End or `return`), in id order
    pub fn terminals<'a>(&'a self, graph: &'a FlowGraph) -> impl Iterator<Item = NodeId> + 'a {
        self.visited
            .iter()
            .copied()
            .filter(move |&id| super::analysis::is_terminal(graph, id))
    }
}

/// Predict the edges traversed for `inputs`
///
/// Depth-first from Start, each node expanded at most once. Non-branch
/// nodes follow every outgoing edge. Variables missing from `inputs`
/// leave their branches `Unknown`, which follows both arms. A graph
/// without a Start node yields an empty path.
pub fn predict_path(graph: &FlowGraph, inputs: &Assignment) -> PredictedPath {
    let mut edges = BTreeSet::new();
    let mut visited = BTreeSet::new();
    let mut decisions = BTreeMap::new();

    let mut stack: Vec<NodeId> = find_start(graph).into_iter().collect();
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(node) = graph.node(id) else {
            continue;
        };

        let next: Vec<FlowEdge> = if node.kind == NodeKind::Branch {
            let truth = node
                .condition
                .as_ref()
                .map_or(Truth::Unknown, |cond| evaluate(cond, inputs));
            tracing::trace!(node = id, label = %node.label, ?truth, "branch decided");
            decisions.insert(id, truth);

            match truth.to_bool() {
                Some(outcome) => graph
                    .outgoing_labeled(id, EdgeLabel::for_outcome(outcome))
                    .into_iter()
                    .collect(),
                None => [EdgeLabel::True, EdgeLabel::False]
                    .into_iter()
                    .filter_map(|label| graph.outgoing_labeled(id, label))
                    .collect(),
            }
        } else {
            graph.outgoing(id)
        };

        // reversed so the first edge is expanded first
        for edge in next.iter().rev() {
            edges.insert(edge.endpoints());
            stack.push(edge.to);
        }
    }

    let path_id = hash_edges(&edges);
    tracing::debug!(edges = edges.len(), path_id = %path_id, "predicted path");

    PredictedPath {
        edges,
        visited,
        decisions,
        path_id,
    }
}

/// Hash an edge set with BLAKE3
///
/// The set is iterated in sorted order, so equal sets hash equally.
pub fn hash_edges(edges: &BTreeSet<(NodeId, NodeId)>) -> String {
    let mut hasher = blake3::Hasher::new();

    // Include length to prevent collisions
    hasher.update(&edges.len().to_le_bytes());

    for &(from, to) in edges {
        hasher.update(&from.to_le_bytes());
        hasher.update(&to.to_le_bytes());
    }

    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::build_flow_graph;
    use crate::predicate::{PredicateExpr, RelOp};
    use crate::program::Stmt;

    fn inputs(pairs: &[(&str, i64)]) -> Assignment {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    /// Start(0) -> (x > 0)(1) -T-> True(2) -> return 1(3)
    ///                        -F-> False(4) -> return 0(5)
    fn create_diamond_graph() -> FlowGraph {
        build_flow_graph(&[Stmt::if_else(
            PredicateExpr::cmp("x", RelOp::Gt, 0),
            vec![Stmt::ret("1")],
            vec![Stmt::ret("0")],
        )])
    }

    #[test]
    fn test_true_branch_only() {
        let g = create_diamond_graph();
        let path = predict_path(&g, &inputs(&[("x", 1)]));
        assert_eq!(path.edges, BTreeSet::from([(0, 1), (1, 2), (2, 3)]));
        assert_eq!(path.decisions.get(&1), Some(&Truth::True));
        assert_eq!(path.terminals(&g).collect::<Vec<_>>(), vec![3]);
        assert!(!path.is_ambiguous());
    }

    #[test]
    fn test_false_branch_only() {
        let g = create_diamond_graph();
        let path = predict_path(&g, &inputs(&[("x", 0)]));
        assert_eq!(path.edges, BTreeSet::from([(0, 1), (1, 4), (4, 5)]));
        assert!(!path.contains_edge(1, 2));
    }

    #[test]
    fn test_unknown_follows_both() {
        let g = create_diamond_graph();
        let path = predict_path(&g, &inputs(&[]));
        assert!(path.contains_edge(1, 2));
        assert!(path.contains_edge(1, 4));
        assert_eq!(path.edges.len(), 5);
        assert!(path.is_ambiguous());
        assert_eq!(path.terminals(&g).collect::<Vec<_>>(), vec![3, 5]);
    }

    #[test]
    fn test_opaque_condition_follows_both() {
        let g = build_flow_graph(&[Stmt::if_then(
            PredicateExpr::opaque("ready()"),
            vec![Stmt::simple("go();")],
        )]);
        let path = predict_path(&g, &inputs(&[("x", 1)]));
        assert_eq!(path.visited.len(), g.node_count());
        assert_eq!(path.edges.len(), g.edge_count());
    }

    #[test]
    fn test_merge_point_visited_once() {
        // both arms join at "return r"
        let g = build_flow_graph(&[
            Stmt::if_then(PredicateExpr::cmp("x", RelOp::Gt, 0), vec![]),
            Stmt::ret("r"),
        ]);
        let path = predict_path(&g, &inputs(&[]));
        assert_eq!(path.edges.len(), g.edge_count());
        assert_eq!(path.visited.len(), g.node_count());
    }

    #[test]
    fn test_dead_code_never_visited() {
        let g = build_flow_graph(&[Stmt::ret("0"), Stmt::simple("dead();")]);
        let path = predict_path(&g, &inputs(&[]));
        assert_eq!(path.visited, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_empty_graph() {
        let path = predict_path(&FlowGraph::default(), &inputs(&[]));
        assert!(path.edges.is_empty());
        assert!(path.visited.is_empty());
    }

    #[test]
    fn test_path_id_stable() {
        let g = create_diamond_graph();
        let a = predict_path(&g, &inputs(&[("x", 5)]));
        let b = predict_path(&g, &inputs(&[("x", 9)]));
        let c = predict_path(&g, &inputs(&[("x", -5)]));
        assert_eq!(a.path_id, b.path_id);
        assert_ne!(a.path_id, c.path_id);
        assert_eq!(a.path_id.len(), 64);
    }
}
