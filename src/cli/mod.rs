// CLI command definitions

use crate::testgen::CoverageMode;
use clap::{Parser, Subcommand, ValueEnum};

/// Pathcast - coverage-driven test synthesis and path prediction
///
/// Reads functions already parsed into condition and statement trees,
/// synthesizes C0/C1 test inputs, builds control-flow graphs and predicts
/// the path each input takes.
#[derive(Parser, Debug, Clone)]
#[command(name = "pathcast")]
#[command(author, version, about)]
#[command(long_about = "Pathcast synthesizes test inputs for branching functions and predicts their paths.

For every function in a parsed source unit it:
  - decomposes branch conditions into atomic comparisons
  - synthesizes a baseline case plus a True and a False case per atom
  - builds a control-flow graph of the body
  - predicts which edges each input traverses (both arms when undecidable)

The source unit is JSON produced by an external parser; see README.md for its shape.")]
pub struct Cli {
    /// Path to the parsed source unit (JSON) [default: ./functions.json]
    #[arg(global = true, long, env = "PATHCAST_SOURCE")]
    pub source: Option<String>,

    /// Test generation mode
    #[arg(global = true, long, value_enum, env = "PATHCAST_MODE", default_value_t = ModeArg::C1)]
    pub mode: ModeArg,

    /// Output format
    #[arg(global = true, long, value_enum, default_value_t = OutputFormat::Human)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// Compact JSON for programmatic consumption
    Json,
    /// Formatted JSON with indentation
    Pretty,
}

/// Test generation mode
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Baseline case only
    C0,
    /// Baseline plus True/False per atomic condition (MC/DC-like)
    C1,
}

impl From<ModeArg> for CoverageMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::C0 => CoverageMode::C0,
            ModeArg::C1 => CoverageMode::C1,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show synthesized test cases per function
    Tests(TestsArgs),

    /// Show the control-flow graph of each function
    Cfg(CfgArgs),

    /// Predict the path taken for one input assignment
    Predict(PredictArgs),

    /// Test cases, graph and predicted path of every case
    Analyze(AnalyzeArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct TestsArgs {
    /// Only this function
    #[arg(long)]
    pub function: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CfgArgs {
    /// Only this function
    #[arg(long)]
    pub function: Option<String>,

    /// Verify structural invariants of each graph
    #[arg(long)]
    pub check: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Function to predict for
    #[arg(long)]
    pub function: String,

    /// Index of a synthesized test case
    #[arg(long, conflicts_with = "input")]
    pub case: Option<usize>,

    /// Input assignment `name=value` (repeatable; missing names stay unknown)
    #[arg(long)]
    pub input: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Only this function
    #[arg(long)]
    pub function: Option<String>,
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Resolve the source unit path from multiple sources
///
/// Priority: CLI arg > PATHCAST_SOURCE env var > default "./functions.json"
pub fn resolve_source_path(cli_source: Option<String>) -> String {
    cli_source
        .or_else(|| std::env::var("PATHCAST_SOURCE").ok())
        .unwrap_or_else(|| "./functions.json".to_string())
}

/// Parse one `name=value` assignment
pub fn parse_assignment(raw: &str) -> crate::error::Result<(String, i64)> {
    let invalid = || crate::error::PathcastError::InvalidAssignment(raw.to_string());
    let (name, value) = raw.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    let value = value.trim().parse::<i64>().map_err(|_| invalid())?;
    Ok((name.to_string(), value))
}

// ============================================================================
// Command Handlers
// ============================================================================

pub mod cmds {
    use super::*;
    use crate::analysis::{analyze_unit, FunctionReport, TestTable};
    use crate::cfg::{check_invariants, export_json, CfgExport, NodeKind, PredictedPath};
    use crate::error::PathcastError;
    use crate::output::{self, JsonError, JsonResponse};
    use crate::predicate::{Assignment, Truth};
    use crate::program::SourceUnit;
    use crate::testgen::TestCase;
    use anyhow::Result;
    use serde::Serialize;
    use std::path::Path;

    #[derive(Debug, Serialize)]
    struct TestsData {
        function: String,
        mode: CoverageMode,
        table: TestTable,
    }

    #[derive(Debug, Serialize)]
    struct CfgData {
        cfg: CfgExport,
        /// Present when `--check` ran; a failed check exits through `fail`
        #[serde(skip_serializing_if = "Option::is_none")]
        valid: Option<bool>,
    }

    #[derive(Debug, Serialize)]
    struct PredictData {
        function: String,
        inputs: Assignment,
        path: PredictedPath,
        terminals: Vec<String>,
    }

    #[derive(Debug, Serialize)]
    struct CasePath {
        case: usize,
        test: TestCase,
        path_id: String,
        edges: Vec<(usize, usize)>,
        terminals: Vec<String>,
        ambiguous: bool,
    }

    #[derive(Debug, Serialize)]
    struct AnalyzeData {
        function: String,
        mode: CoverageMode,
        cfg: CfgExport,
        cases: Vec<CasePath>,
    }

    pub fn tests(args: TestsArgs, cli: &Cli) -> Result<()> {
        let reports = load_reports(cli, args.function.as_deref())?;

        let data: Vec<TestsData> = reports
            .iter()
            .map(|r| TestsData {
                function: r.name().to_string(),
                mode: r.mode,
                table: r.table(),
            })
            .collect();

        match cli.output {
            OutputFormat::Human => {
                for item in &data {
                    output::header(&format!("Function {} - {}", item.function, item.mode));
                    print_table(&item.table);
                    println!();
                }
            }
            format => emit_json(format, &data),
        }
        Ok(())
    }

    pub fn cfg(args: CfgArgs, cli: &Cli) -> Result<()> {
        let reports = load_reports(cli, args.function.as_deref())?;

        let mut data = Vec::new();
        for report in &reports {
            let cfg = export_json(&report.graph, report.name(), None);
            if args.check {
                if let Err(e) = check_invariants(&report.graph) {
                    tracing::warn!(function = report.name(), error = %e, "flow graph check failed");
                    if cli.output == OutputFormat::Human {
                        output::header(&format!("Control-flow graph of {}", cfg.function_name));
                        print_cfg(&cfg, None);
                    }
                    fail(cli, e.into());
                }
            }
            data.push(CfgData {
                cfg,
                valid: args.check.then_some(true),
            });
        }

        match cli.output {
            OutputFormat::Human => {
                for item in &data {
                    output::header(&format!("Control-flow graph of {}", item.cfg.function_name));
                    print_cfg(&item.cfg, None);
                    if item.valid.is_some() {
                        output::success("Flow graph invariants hold");
                    }
                    println!();
                }
            }
            format => emit_json(format, &data),
        }
        Ok(())
    }

    pub fn predict(args: PredictArgs, cli: &Cli) -> Result<()> {
        let reports = load_reports(cli, Some(&args.function))?;
        let Some(report) = reports.first() else {
            return Ok(());
        };

        let inputs = match args.case {
            Some(index) => match report.tests.get(index) {
                Some(case) => case.inputs.clone(),
                None => fail(
                    cli,
                    PathcastError::CaseOutOfRange {
                        function: report.name().to_string(),
                        index,
                        count: report.tests.len(),
                    },
                ),
            },
            None => {
                let mut inputs = Assignment::new();
                for raw in &args.input {
                    match parse_assignment(raw) {
                        Ok((name, value)) => {
                            inputs.insert(name, value);
                        }
                        Err(e) => fail(cli, e),
                    }
                }
                inputs
            }
        };

        let path = report.predict_inputs(&inputs);
        let terminals = terminal_labels(report, &path);

        match cli.output {
            OutputFormat::Human => {
                output::header(&format!(
                    "Predicted path of {} for {}",
                    report.name(),
                    format_inputs(&inputs)
                ));
                print_cfg(&export_json(&report.graph, report.name(), Some(&path)), Some(&path));
                print_decisions(report, &path);
                println!("Reaches: {}", terminals.join(", "));
                println!("Path ID: {}", path.path_id);
            }
            format => emit_json(
                format,
                &PredictData {
                    function: report.name().to_string(),
                    inputs,
                    path,
                    terminals,
                },
            ),
        }
        Ok(())
    }

    pub fn analyze(args: AnalyzeArgs, cli: &Cli) -> Result<()> {
        let reports = load_reports(cli, args.function.as_deref())?;

        let data: Vec<AnalyzeData> = reports
            .iter()
            .map(|report| {
                let cases = report
                    .tests
                    .iter()
                    .enumerate()
                    .map(|(index, test)| {
                        let path = report.predict_inputs(&test.inputs);
                        CasePath {
                            case: index,
                            test: test.clone(),
                            terminals: terminal_labels(report, &path),
                            ambiguous: path.is_ambiguous(),
                            edges: path.edges.iter().copied().collect(),
                            path_id: path.path_id,
                        }
                    })
                    .collect();
                AnalyzeData {
                    function: report.name().to_string(),
                    mode: report.mode,
                    cfg: export_json(&report.graph, report.name(), None),
                    cases,
                }
            })
            .collect();

        match cli.output {
            OutputFormat::Human => {
                for (report, item) in reports.iter().zip(&data) {
                    output::header(&format!("Function {} - {}", item.function, item.mode));
                    print_table(&report.table());
                    println!();
                    print_cfg(&item.cfg, None);
                    println!("Paths:");
                    for case in &item.cases {
                        let marker = if case.ambiguous { " (ambiguous)" } else { "" };
                        println!(
                            "  #{:<3} {} -> {}{}  [{}]",
                            case.case,
                            format_inputs(&case.test.inputs),
                            case.terminals.join(", "),
                            marker,
                            &case.path_id[..12.min(case.path_id.len())]
                        );
                    }
                    println!();
                }
            }
            format => emit_json(format, &data),
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Load the source unit and analyze the selected functions
    ///
    /// An empty unit is reported as a warning and yields no reports.
    fn load_reports(cli: &Cli, function: Option<&str>) -> Result<Vec<FunctionReport>> {
        let source = resolve_source_path(cli.source.clone());
        let unit = match SourceUnit::load(Path::new(&source)) {
            Ok(unit) => unit,
            Err(e) => fail(cli, e),
        };

        if unit.is_empty() {
            output::warn("No function definitions found in source unit");
            if let Some(name) = function {
                fail(cli, PathcastError::FunctionNotFound(name.to_string()));
            }
            return Ok(vec![]);
        }

        let unit = match function {
            Some(name) => match unit.function(name) {
                Ok(def) => SourceUnit {
                    functions: vec![def.clone()],
                },
                Err(e) => fail(cli, e),
            },
            None => unit,
        };

        Ok(analyze_unit(&unit, cli.mode.into()))
    }

    /// Report a boundary error in the selected format and exit
    fn fail(cli: &Cli, err: PathcastError) -> ! {
        let message = err.to_string();
        let (json, code) = classify(&err);

        match cli.output {
            OutputFormat::Human => output::error(&message),
            OutputFormat::Json => println!("{}", JsonResponse::new(json).to_json()),
            OutputFormat::Pretty => println!("{}", JsonResponse::new(json).to_pretty_json()),
        }
        std::process::exit(code);
    }

    /// JSON error payload and exit code for a boundary error
    pub(crate) fn classify(err: &PathcastError) -> (JsonError, i32) {
        let message = err.to_string();
        match err {
            PathcastError::Io { .. } => (JsonError::source_not_found(&message), output::EXIT_FILE_NOT_FOUND),
            PathcastError::Json(_) | PathcastError::DuplicateParam { .. } => {
                (JsonError::invalid_source(&message), output::EXIT_VALIDATION)
            }
            PathcastError::FunctionNotFound(name) => (JsonError::function_not_found(name), output::EXIT_NOT_FOUND),
            PathcastError::CaseOutOfRange { .. } => (JsonError::case_not_found(&message), output::EXIT_NOT_FOUND),
            PathcastError::InvalidAssignment(_) => (JsonError::invalid_input(&message), output::EXIT_USAGE),
            PathcastError::Cfg(_) => (JsonError::cfg_error(&message), output::EXIT_VALIDATION),
        }
    }

    fn emit_json<T: Serialize>(format: OutputFormat, data: &T) {
        let response = JsonResponse::new(data);
        if format == OutputFormat::Pretty {
            println!("{}", response.to_pretty_json());
        } else {
            println!("{}", response.to_json());
        }
    }

    fn format_inputs(inputs: &Assignment) -> String {
        let pairs: Vec<String> = inputs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{{{}}}", pairs.join(", "))
    }

    fn terminal_labels(report: &FunctionReport, path: &PredictedPath) -> Vec<String> {
        path.terminals(&report.graph)
            .filter_map(|id| report.graph.node(id))
            .map(|n| n.label.clone())
            .collect()
    }

    fn print_table(table: &TestTable) {
        let mut widths: Vec<usize> = table.columns.iter().map(|c| c.len()).collect();
        for row in &table.rows {
            for (i, v) in row.values.iter().enumerate() {
                widths[i] = widths[i].max(v.to_string().len());
            }
        }

        let header: Vec<String> = table
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:>w$}", c, w = w))
            .collect();
        println!("  {}", header.join("  ").trim_end());

        for row in &table.rows {
            let mut cells: Vec<String> = row
                .values
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!("{:>w$}", v, w = w))
                .collect();
            cells.push(row.reason.clone());
            println!("  {}", cells.join("  "));
        }
    }

    fn print_cfg(cfg: &CfgExport, path: Option<&PredictedPath>) {
        println!("Nodes:");
        for node in &cfg.nodes {
            let kind = match node.kind {
                NodeKind::Start => "START",
                NodeKind::Statement => "STMT",
                NodeKind::Branch => "BRANCH",
                NodeKind::End => "END",
            };
            let line = format!("  [{}] {:<6} {}", node.id, kind, node.label);
            match path {
                Some(p) if p.visited.contains(&node.id) => println!("{}", output::highlight(&line)),
                _ => println!("{}", line),
            }
        }

        println!("Edges:");
        for edge in &cfg.edges {
            let label = if edge.label.is_branch() {
                format!(" [{}]", edge.label)
            } else {
                String::new()
            };
            let line = format!("  {} -> {}{}", edge.from, edge.to, label);
            match edge.taken {
                Some(true) => println!("{}  *", output::highlight(&line)),
                _ => println!("{}", line),
            }
        }

        if !cfg.unreachable.is_empty() {
            output::warn(&format!("Unreachable nodes: {:?}", cfg.unreachable));
        }
    }

    fn print_decisions(report: &FunctionReport, path: &PredictedPath) {
        for (id, truth) in &path.decisions {
            let label = report.graph.node(*id).map(|n| n.label.as_str()).unwrap_or("?");
            let outcome = match truth {
                Truth::True => "True",
                Truth::False => "False",
                Truth::Unknown => "Unknown (both arms)",
            };
            println!("Branch [{}] {} => {}", id, label, outcome);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Ensure tests don't interfere with each other by clearing env var
    fn clear_env() {
        std::env::remove_var("PATHCAST_SOURCE");
    }

    #[test]
    fn test_resolve_source_path() {
        // env var handling shares process state, so keep it in one test
        clear_env();
        assert_eq!(resolve_source_path(None), "./functions.json");
        assert_eq!(resolve_source_path(Some("/cli/unit.json".to_string())), "/cli/unit.json");

        std::env::set_var("PATHCAST_SOURCE", "/env/unit.json");
        assert_eq!(resolve_source_path(None), "/env/unit.json");
        assert_eq!(resolve_source_path(Some("/cli/unit.json".to_string())), "/cli/unit.json");
        clear_env();
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("x=1").unwrap(), ("x".to_string(), 1));
        assert_eq!(parse_assignment(" y = -7 ").unwrap(), ("y".to_string(), -7));
        assert!(parse_assignment("x").is_err());
        assert!(parse_assignment("=3").is_err());
        assert!(parse_assignment("x=abc").is_err());
    }

    #[test]
    fn test_cli_parses_predict() {
        let cli = Cli::try_parse_from([
            "pathcast", "--source", "unit.json", "predict", "--function", "foo", "--input", "x=1",
            "--input", "y=0",
        ])
        .unwrap();
        assert_eq!(cli.mode, ModeArg::C1);
        match cli.command {
            Commands::Predict(args) => {
                assert_eq!(args.function, "foo");
                assert_eq!(args.input, vec!["x=1", "y=0"]);
                assert_eq!(args.case, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_case_conflicts_with_input() {
        let result = Cli::try_parse_from([
            "pathcast", "predict", "--function", "foo", "--case", "1", "--input", "x=1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_classify_errors() {
        use crate::cfg::CfgError;
        use crate::error::PathcastError;
        use crate::output;

        let (json, code) = cmds::classify(&PathcastError::from(CfgError::MissingStart));
        assert_eq!(json.code, output::E_CFG_ERROR);
        assert_eq!(json.error, "CfgError");
        assert_eq!(code, output::EXIT_VALIDATION);

        let (json, code) = cmds::classify(&PathcastError::FunctionNotFound("foo".to_string()));
        assert_eq!(json.code, output::E_FUNCTION_NOT_FOUND);
        assert_eq!(code, output::EXIT_NOT_FOUND);

        let (json, code) = cmds::classify(&PathcastError::InvalidAssignment("x".to_string()));
        assert_eq!(json.code, output::E_INVALID_INPUT);
        assert_eq!(code, output::EXIT_USAGE);
    }

    #[test]
    fn test_mode_conversion() {
        assert_eq!(CoverageMode::from(ModeArg::C0), CoverageMode::C0);
        assert_eq!(CoverageMode::from(ModeArg::C1), CoverageMode::C1);
    }
}
