use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sable_lang::{Interpreter, InterpreterConfig, compile};

#[derive(Parser)]
#[command(name = "sable")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a Sable script", long_about = None)]
struct Cli {
    /// Script to run
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Log evaluator activity (calls, derived bindings, played notes)
    #[arg(short, long)]
    verbose: bool,

    /// Maximum nested function calls before aborting
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let source = match std::fs::read_to_string(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {e}", cli.input.display());
            return ExitCode::from(2);
        }
    };

    let program = match compile(&source) {
        Ok(p) => p,
        Err(errs) => {
            for e in &errs {
                eprintln!("{}: {e}", cli.input.display());
            }
            return ExitCode::from(1);
        }
    };

    let mut config = InterpreterConfig::default();
    if let Some(depth) = cli.max_depth {
        config.max_call_depth = depth;
    }
    tracing::debug!(file = %cli.input.display(), stmts = program.stmts.len(), "running");

    match Interpreter::new().with_config(config).evaluate(&program) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", cli.input.display());
            ExitCode::from(1)
        }
    }
}
