//! Flow graph construction from a statement tree
//!
//! The walk threads a *frontier* through the body: the ids of nodes still
//! waiting for a successor. Each statement consumes the current frontier and
//! returns the next one:
//! - simple statement: one Statement node, frontier becomes that node
//! - `if`: a Branch node plus a `True` and a `False` anchor node; each arm
//!   is walked from its anchor and the two resulting frontiers are
//!   concatenated (this is how the code after the `if` joins both arms)
//! - `return`: a Statement node with no frontier after it
//!
//! Whatever frontier is left at the end of the body is joined into a single
//! End node. A body where every path returns has no End node.

use crate::cfg::{EdgeLabel, FlowGraph, NodeId, NodeKind};
use crate::program::Stmt;

/// Build the flow graph of a function body
pub fn build_flow_graph(body: &[Stmt]) -> FlowGraph {
    FlowGraphBuilder::new().build(body)
}

/// Frontier-threading flow graph builder
///
/// Consumed by [`FlowGraphBuilder::build`]; build a fresh one per body.
pub struct FlowGraphBuilder {
    /// The graph being built
    graph: FlowGraph,
}

impl FlowGraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: FlowGraph::new(),
        }
    }

    /// Walk `body` from a fresh Start node and close open paths into End
    pub fn build(mut self, body: &[Stmt]) -> FlowGraph {
        let start = self.graph.add_node(NodeKind::Start, "Start", None);
        let frontier = self.walk_block(body, vec![start]);

        if frontier.is_empty() {
            tracing::trace!("every path returns, no End node");
        } else {
            let end = self.graph.add_node(NodeKind::End, "End", None);
            self.connect(&frontier, end, EdgeLabel::Fallthrough);
        }

        tracing::debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "built flow graph"
        );
        self.graph
    }

    fn walk_block(&mut self, block: &[Stmt], incoming: Vec<NodeId>) -> Vec<NodeId> {
        block
            .iter()
            .fold(incoming, |frontier, stmt| self.walk_stmt(stmt, frontier))
    }

    fn walk_stmt(&mut self, stmt: &Stmt, frontier: Vec<NodeId>) -> Vec<NodeId> {
        match stmt {
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                let branch = self
                    .graph
                    .add_node(NodeKind::Branch, cond.to_string(), Some(cond.clone()));
                self.connect(&frontier, branch, EdgeLabel::Fallthrough);

                let then_entry = self.branch_entry(branch, EdgeLabel::True);
                let mut open = self.walk_block(then, vec![then_entry]);

                let else_entry = self.branch_entry(branch, EdgeLabel::False);
                let else_open = match otherwise {
                    Some(block) => self.walk_block(block, vec![else_entry]),
                    None => vec![else_entry],
                };

                open.extend(else_open);
                open
            }
            Stmt::Return { value } => {
                let label = match value {
                    Some(value) => format!("return {}", value),
                    None => "return".to_string(),
                };
                let ret = self.graph.add_node(NodeKind::Statement, label, None);
                self.connect(&frontier, ret, EdgeLabel::Fallthrough);
                vec![]
            }
            Stmt::Simple { text } => {
                let id = self.graph.add_node(NodeKind::Statement, text.as_str(), None);
                self.connect(&frontier, id, EdgeLabel::Fallthrough);
                vec![id]
            }
        }
    }

    /// Anchor node for one arm, so the arm's edge exists even when it is empty
    fn branch_entry(&mut self, branch: NodeId, label: EdgeLabel) -> NodeId {
        let entry = self.graph.add_node(NodeKind::Statement, label.as_str(), None);
        self.graph.add_edge(branch, entry, label);
        entry
    }

    fn connect(&mut self, frontier: &[NodeId], to: NodeId, label: EdgeLabel) {
        for &from in frontier {
            self.graph.add_edge(from, to, label);
        }
    }
}

impl Default for FlowGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
