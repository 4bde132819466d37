// Pathcast: coverage-driven test synthesis and execution path prediction
//
// Consumes functions already parsed into condition/statement trees,
// synthesizes C0/C1 test inputs, builds control-flow graphs and predicts
// the edges each input traverses.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pathcast::cli::{self, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: RUST_LOG when set, WARN otherwise
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Run the appropriate command
    run_command(cli)?;

    Ok(())
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command.clone() {
        Commands::Tests(args) => cli::cmds::tests(args, &cli)?,
        Commands::Cfg(args) => cli::cmds::cfg(args, &cli)?,
        Commands::Predict(args) => cli::cmds::predict(args, &cli)?,
        Commands::Analyze(args) => cli::cmds::analyze(args, &cli)?,
    }
    Ok(())
}
