//! Flow graph export for JSON consumers

use crate::cfg::{analysis, reachability, EdgeLabel, FlowGraph, FlowNode, NodeId, PredictedPath};
use serde::{Deserialize, Serialize};

/// Complete flow graph export for JSON serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfgExport {
    pub function_name: String,
    pub start: Option<NodeId>,
    pub ends: Vec<NodeId>,
    pub unreachable: Vec<NodeId>,
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<EdgeExport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeExport {
    pub from: NodeId,
    pub to: NodeId,
    pub label: EdgeLabel,
    /// Whether a predicted path takes this edge; absent without a path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken: Option<bool>,
}

/// Export a flow graph, optionally marking the edges of a predicted path
pub fn export_json(graph: &FlowGraph, function_name: &str, path: Option<&PredictedPath>) -> CfgExport {
    let edges = graph
        .edges()
        .into_iter()
        .map(|e| EdgeExport {
            from: e.from,
            to: e.to,
            label: e.label,
            taken: path.map(|p| p.contains_edge(e.from, e.to)),
        })
        .collect();

    CfgExport {
        function_name: function_name.to_string(),
        start: analysis::find_start(graph),
        ends: analysis::find_ends(graph),
        unreachable: reachability::find_unreachable(graph),
        nodes: graph.nodes().cloned().collect(),
        edges,
    }
}
