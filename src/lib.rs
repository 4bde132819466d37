// Pathcast: coverage-driven test synthesis and execution path prediction
//
// Condition decomposition, boundary-value test synthesis, control-flow
// graph construction and three-valued path prediction for single
// functions with nested integer branching.

pub mod analysis;
pub mod cfg;
pub mod cli;
pub mod error;
pub mod output;
pub mod predicate;
pub mod program;
pub mod testgen;

pub use analysis::{analyze_function, analyze_unit, FunctionReport};
pub use cfg::{build_flow_graph, predict_path, FlowEdge, FlowGraph, FlowNode, NodeKind, PredictedPath};
pub use error::{PathcastError, Result};
pub use predicate::{evaluate, flatten, Assignment, PredicateExpr, Truth};
pub use program::{FunctionDef, FunctionSignature, Param, SourceUnit, Stmt};
pub use testgen::{synthesize, CoverageMode, TestCase};
