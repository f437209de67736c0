//! tsp-grasp CLI
//!
//! Command-line interface for the nearest-neighbor, 2-opt, GRASP and exact
//! solvers. All logic lives in [`tsp_grasp::cli`].

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tsp_grasp::cli::{run_cli, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.common.verbose);
    run_cli(&args)
}

/// Logs go to stderr so stdout carries only the report.
/// `RUST_LOG` overrides `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
