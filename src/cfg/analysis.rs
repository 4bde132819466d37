//! Flow graph analysis: Start/End lookup and structural invariants

use crate::cfg::{EdgeLabel, FlowGraph, NodeId, NodeKind};
use thiserror::Error;

/// Violation of a flow graph structural invariant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CfgError {
    #[error("Flow graph has no Start node")]
    MissingStart,

    #[error("Flow graph has {0} Start nodes, expected exactly one")]
    MultipleStarts(usize),

    #[error("Start node {0} has incoming edges")]
    StartHasIncoming(NodeId),

    #[error("Flow graph has {0} End nodes, expected at most one")]
    MultipleEnds(usize),

    #[error("End node {0} has outgoing edges")]
    EndHasOutgoing(NodeId),

    #[error("Branch node {node} has {true_edges} True and {false_edges} False edges, expected one of each")]
    BranchEdges {
        node: NodeId,
        true_edges: usize,
        false_edges: usize,
    },

    #[error("Branch node {0} has no condition")]
    BranchWithoutCondition(NodeId),

    #[error("Non-branch node {node} emits a '{label}' edge")]
    StrayBranchLabel { node: NodeId, label: EdgeLabel },
}

/// Find the Start node
///
/// Returns None if the graph has no Start node (e.g. it is empty).
pub fn find_start(graph: &FlowGraph) -> Option<NodeId> {
    graph
        .nodes()
        .find(|n| n.kind == NodeKind::Start)
        .map(|n| n.id)
}

/// Find all End nodes (at most one in a built graph)
pub fn find_ends(graph: &FlowGraph) -> Vec<NodeId> {
    graph
        .nodes()
        .filter(|n| n.kind == NodeKind::End)
        .map(|n| n.id)
        .collect()
}

/// Check if a node terminates a path (End node or `return` statement)
pub fn is_terminal(graph: &FlowGraph, id: NodeId) -> bool {
    match graph.node(id) {
        Some(node) => node.kind == NodeKind::End || out_degree(graph, id) == 0,
        None => false,
    }
}

/// Count incoming edges to a node
pub fn in_degree(graph: &FlowGraph, id: NodeId) -> usize {
    graph.incoming(id).len()
}

/// Count outgoing edges from a node
pub fn out_degree(graph: &FlowGraph, id: NodeId) -> usize {
    graph.outgoing(id).len()
}

/// Verify the structural invariants of a flow graph
///
/// - exactly one Start node, with no incoming edges
/// - at most one End node, with no outgoing edges
/// - every Branch node carries a condition and has exactly one `True`
///   and one `False` outgoing edge
/// - no other node emits a `True`/`False` edge
pub fn check_invariants(graph: &FlowGraph) -> Result<(), CfgError> {
    let starts: Vec<_> = graph
        .nodes()
        .filter(|n| n.kind == NodeKind::Start)
        .map(|n| n.id)
        .collect();
    match starts.as_slice() {
        [] => return Err(CfgError::MissingStart),
        [start] => {
            if in_degree(graph, *start) > 0 {
                return Err(CfgError::StartHasIncoming(*start));
            }
        }
        many => return Err(CfgError::MultipleStarts(many.len())),
    }

    let ends = find_ends(graph);
    if ends.len() > 1 {
        return Err(CfgError::MultipleEnds(ends.len()));
    }

    for node in graph.nodes() {
        let out = graph.outgoing(node.id);
        match node.kind {
            NodeKind::Branch => {
                if node.condition.is_none() {
                    return Err(CfgError::BranchWithoutCondition(node.id));
                }
                let true_edges = out.iter().filter(|e| e.label == EdgeLabel::True).count();
                let false_edges = out.iter().filter(|e| e.label == EdgeLabel::False).count();
                if true_edges != 1 || false_edges != 1 || out.len() != 2 {
                    return Err(CfgError::BranchEdges {
                        node: node.id,
                        true_edges,
                        false_edges,
                    });
                }
            }
            NodeKind::End if !out.is_empty() => {
                return Err(CfgError::EndHasOutgoing(node.id));
            }
            _ => {
                if let Some(edge) = out.iter().find(|e| e.label.is_branch()) {
                    return Err(CfgError::StrayBranchLabel {
                        node: node.id,
                        label: edge.label,
                    });
                }
            }
        }
    }

    Ok(())
}
