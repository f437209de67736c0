//! CLI argument parsing.
//!
//! Options shared by every subcommand are global, so they may appear
//! before or after the subcommand name. Options that also exist in the
//! config file are `Option`s: `None` means "keep the file's value".

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Matrix read when no path is given.
pub const DEFAULT_MATRIX_PATH: &str = "data/matriz_a.csv";

/// Version string with the commit the binary was built from.
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "tsp-grasp", version, long_version = LONG_VERSION)]
#[command(about = "Nearest neighbor, 2-opt, GRASP and exact search for the TSP", long_about = None)]
pub struct Args {
    /// Options shared by all commands.
    #[command(flatten)]
    pub common: CommonArgs,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Input, policy and output options.
#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct CommonArgs {
    /// Field separator of delimited matrix files [default: ;]
    #[arg(long, global = true, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Distances at or above this value mean "no link" [default: 1000]
    #[arg(long, global = true, value_name = "T")]
    pub no_link_threshold: Option<f64>,

    /// Off-diagonal zeros mean "no link"
    #[arg(long, global = true, conflicts_with = "no_link_threshold")]
    pub zero_no_link: bool,

    /// YAML solver configuration
    #[arg(long, global = true, value_name = "FILE.yaml")]
    pub config: Option<PathBuf>,

    /// Print a JSON report instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// GRASP: randomized greedy construction plus 2-opt under a time budget
    Grasp(GraspArgs),
    /// Nearest-neighbor greedy tour
    Greedy(GreedyArgs),
    /// 2-opt from the naive tour 1 → 2 → … → n → 1, printing every step
    TwoOpt(TwoOptArgs),
    /// Exhaustive search (at most 13 cities)
    Exact(ExactArgs),
}

impl Command {
    /// Matrix path of the command.
    #[must_use]
    pub fn matrix(&self) -> &PathBuf {
        match self {
            Self::Grasp(a) => &a.matrix,
            Self::Greedy(a) => &a.matrix,
            Self::TwoOpt(a) => &a.matrix,
            Self::Exact(a) => &a.matrix,
        }
    }
}

/// `grasp` options.
#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct GraspArgs {
    /// Matrix file (.csv-like or .yaml instance)
    #[arg(default_value = DEFAULT_MATRIX_PATH)]
    pub matrix: PathBuf,

    /// Restricted Candidate List size
    #[arg(short = 'k', long = "rcl")]
    pub rcl_size: Option<usize>,

    /// Total time budget in seconds
    #[arg(short = 't', long = "time", value_name = "SECS")]
    pub time_budget: Option<f64>,

    /// 2-opt time budget per iteration in seconds
    #[arg(short = 'l', long = "local-time", value_name = "SECS")]
    pub local_search_budget: Option<f64>,

    /// Master seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Parallel workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Iteration cap per worker
    #[arg(long)]
    pub iterations: Option<u64>,

    /// Fixed 1-based start city (random when absent)
    #[arg(long, value_name = "CITY")]
    pub start: Option<usize>,

    /// Apply the best 2-opt move of each scan instead of the first
    #[arg(long)]
    pub best_improvement: bool,
}

/// `greedy` options.
#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct GreedyArgs {
    /// Matrix file (.csv-like or .yaml instance)
    #[arg(default_value = DEFAULT_MATRIX_PATH)]
    pub matrix: PathBuf,

    /// 1-based start city
    #[arg(long, default_value_t = 1, value_name = "CITY")]
    pub start: usize,

    /// Try every start city and keep the cheapest tour
    #[arg(long)]
    pub every_start: bool,

    /// Break distance ties at random
    #[arg(long)]
    pub random_ties: bool,

    /// Seed for random tie-breaking
    #[arg(long, requires = "random_ties")]
    pub seed: Option<u64>,
}

/// `two-opt` options.
#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct TwoOptArgs {
    /// Matrix file (.csv-like or .yaml instance)
    #[arg(default_value = DEFAULT_MATRIX_PATH)]
    pub matrix: PathBuf,

    /// Stop after this many moves
    #[arg(long)]
    pub max_moves: Option<u64>,

    /// Apply the best move of each scan instead of the first
    #[arg(long)]
    pub best_improvement: bool,
}

/// `exact` options.
#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct ExactArgs {
    /// Matrix file (.csv-like or .yaml instance)
    #[arg(default_value = DEFAULT_MATRIX_PATH)]
    pub matrix: PathBuf,

    /// Depth-first search with cost-bound pruning instead of full enumeration
    #[arg(long)]
    pub prune: bool,
}
