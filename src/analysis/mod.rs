//! Per-function analysis: test table plus flow graph
//!
//! Ties the synthesizer and the graph builder together for each function
//! of a [`SourceUnit`]. Everything here is pure; a host that re-analyzes
//! edited source simply discards old reports and builds new ones.

use crate::cfg::{build_flow_graph, predict_path, FlowGraph, PredictedPath};
use crate::error::{PathcastError, Result};
use crate::predicate::Assignment;
use crate::program::{FunctionDef, FunctionSignature, SourceUnit};
use crate::testgen::{generate, CoverageMode, TestCase};
use serde::Serialize;

/// Analysis result for one function
#[derive(Debug, Clone)]
pub struct FunctionReport {
    pub signature: FunctionSignature,
    pub mode: CoverageMode,
    pub tests: Vec<TestCase>,
    pub graph: FlowGraph,
}

impl FunctionReport {
    pub fn name(&self) -> &str {
        &self.signature.name
    }

    /// Predicted path for the test case at `index`
    pub fn predict(&self, index: usize) -> Result<PredictedPath> {
        let case = self
            .tests
            .get(index)
            .ok_or_else(|| PathcastError::CaseOutOfRange {
                function: self.signature.name.clone(),
                index,
                count: self.tests.len(),
            })?;
        Ok(predict_path(&self.graph, &case.inputs))
    }

    /// Predicted path for an arbitrary assignment
    pub fn predict_inputs(&self, inputs: &Assignment) -> PredictedPath {
        predict_path(&self.graph, inputs)
    }

    /// Test cases as table rows, columns in parameter order
    pub fn table(&self) -> TestTable {
        TestTable::new(&self.signature, &self.tests)
    }
}

/// Analyze one function
pub fn analyze_function(def: &FunctionDef, mode: CoverageMode) -> FunctionReport {
    let roots = def.condition_roots();
    let tests = generate(&def.signature, &roots, mode);
    let graph = build_flow_graph(&def.body);

    tracing::debug!(
        function = def.name(),
        conditions = roots.len(),
        tests = tests.len(),
        nodes = graph.node_count(),
        "analyzed function"
    );

    FunctionReport {
        signature: def.signature.clone(),
        mode,
        tests,
        graph,
    }
}

/// Analyze every function of a unit, in source order
///
/// A unit without functions yields an empty vec; callers report that as
/// "no functions found".
pub fn analyze_unit(unit: &SourceUnit, mode: CoverageMode) -> Vec<FunctionReport> {
    if unit.is_empty() {
        tracing::warn!("no function definitions in source unit");
    }
    unit.functions
        .iter()
        .map(|def| analyze_function(def, mode))
        .collect()
}

/// Tabular view of a function's test cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestTable {
    pub function: String,
    /// Parameter names followed by `reason`
    pub columns: Vec<String>,
    pub rows: Vec<TestRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRow {
    /// One value per parameter, in column order
    pub values: Vec<i64>,
    pub reason: String,
}

impl TestTable {
    pub fn new(signature: &FunctionSignature, tests: &[TestCase]) -> Self {
        let params: Vec<&str> = signature.param_names().collect();
        let mut columns: Vec<String> = params.iter().map(|p| p.to_string()).collect();
        columns.push("reason".to_string());

        let rows = tests
            .iter()
            .map(|case| TestRow {
                values: params.iter().map(|p| case.get(p).unwrap_or(0)).collect(),
                reason: case.reason.clone(),
            })
            .collect();

        Self {
            function: signature.name.clone(),
            columns,
            rows,
        }
    }
}
