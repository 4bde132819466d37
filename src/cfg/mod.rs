// Flow graph data structures shared by the builder, checker and predictor

pub mod analysis;
pub mod builder;
pub mod edge;
pub mod export;
pub mod predict;
pub mod reachability;

pub use analysis::{check_invariants, find_ends, find_start, CfgError};
pub use builder::{build_flow_graph, FlowGraphBuilder};
pub use edge::EdgeLabel;
pub use export::{export_json, CfgExport};
pub use predict::{hash_edges, predict_path, PredictedPath};
pub use reachability::{find_reachable, find_unreachable};

use crate::predicate::PredicateExpr;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

/// Dense node identifier, assigned at creation starting from 0
pub type NodeId = usize;

/// Underlying arena: nodes and edges are addressed by index, never by reference
pub type FlowDiGraph = DiGraph<FlowNode, EdgeLabel>;

/// Node classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Start,
    Statement,
    Branch,
    End,
}

/// Node of a function's flow graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Unique identifier within the graph
    pub id: NodeId,
    pub kind: NodeKind,
    /// Statement or condition text
    pub label: String,
    /// Branch condition; present iff `kind` is `Branch`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<PredicateExpr>,
}

impl FlowNode {
    pub fn is_branch(&self) -> bool {
        self.kind == NodeKind::Branch
    }
}

/// Directed, labeled edge between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub label: EdgeLabel,
}

impl FlowEdge {
    /// The `(from, to)` pair used by path highlighting
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.from, self.to)
    }
}

/// Control flow graph of one function body
///
/// Built once by [`build_flow_graph`] and read-only afterwards; the only
/// mutating methods are crate-private and used by the builder. Nodes are
/// never removed, so ids stay dense and stable.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    graph: FlowDiGraph,
}

impl FlowGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_node(
        &mut self,
        kind: NodeKind,
        label: impl Into<String>,
        condition: Option<PredicateExpr>,
    ) -> NodeId {
        let id = self.graph.node_count();
        let idx = self.graph.add_node(FlowNode {
            id,
            kind,
            label: label.into(),
            condition,
        });
        debug_assert_eq!(idx.index(), id);
        id
    }

    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId, label: EdgeLabel) {
        self.graph
            .add_edge(NodeIndex::new(from), NodeIndex::new(to), label);
    }

    /// Borrow the underlying petgraph arena
    pub fn graph(&self) -> &FlowDiGraph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&FlowNode> {
        self.graph.node_weight(NodeIndex::new(id))
    }

    /// Nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.graph.node_weights()
    }

    /// Edges in creation order
    pub fn edges(&self) -> Vec<FlowEdge> {
        self.graph
            .edge_indices()
            .filter_map(|idx| self.edge(idx))
            .collect()
    }

    /// Outgoing edges of `id`, in creation order
    pub fn outgoing(&self, id: NodeId) -> Vec<FlowEdge> {
        self.directed(id, Direction::Outgoing)
    }

    /// Incoming edges of `id`, in creation order
    pub fn incoming(&self, id: NodeId) -> Vec<FlowEdge> {
        self.directed(id, Direction::Incoming)
    }

    /// First outgoing edge of `id` carrying `label`
    pub fn outgoing_labeled(&self, id: NodeId, label: EdgeLabel) -> Option<FlowEdge> {
        self.outgoing(id).into_iter().find(|e| e.label == label)
    }

    fn directed(&self, id: NodeId, dir: Direction) -> Vec<FlowEdge> {
        if self.node(id).is_none() {
            return vec![];
        }
        // petgraph walks adjacency lists newest-first
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(NodeIndex::new(id), dir)
            .filter_map(|e| self.edge(e.id()).map(|edge| (e.id().index(), edge)))
            .collect();
        edges.sort_by_key(|(idx, _)| *idx);
        edges.into_iter().map(|(_, e)| e).collect()
    }

    fn edge(&self, idx: EdgeIndex) -> Option<FlowEdge> {
        let (from, to) = self.graph.edge_endpoints(idx)?;
        let label = *self.graph.edge_weight(idx)?;
        Some(FlowEdge {
            from: from.index(),
            to: to.index(),
            label,
        })
    }
}
