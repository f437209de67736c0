//! CLI command handlers.
//!
//! [`execute`] does the work and returns a report or an error;
//! [`run_cli`] prints the outcome and maps it to an exit code.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};

use super::args::{Args, Command, CommonArgs, ExactArgs, GraspArgs, GreedyArgs, TwoOptArgs};
use super::output::{
    render_json, render_text, CommandReport, ExactReport, GreedyReport, TwoOptReport,
};
use crate::config::SolverConfig;
use crate::construct::{nearest_neighbor, StartCity, TieBreak};
use crate::engine::SearchRng;
use crate::error::{TspError, TspResult};
use crate::eval::Evaluator;
use crate::exact::{solve_exact, ExactMethod};
use crate::local_search::{AcceptancePolicy, LocalSearchBudget, TwoOpt};
use crate::matrix::{load_any, DistanceMatrix, NoLinkPolicy};
use crate::search::{solve_grasp, FallbackLadder};
use crate::tour::{Solution, Tour};

/// Main CLI entry point.
#[must_use]
pub fn run_cli(args: &Args) -> ExitCode {
    let rendered = execute(args).and_then(|report| {
        if args.common.json {
            render_json(&report)
        } else {
            Ok(render_text(&report))
        }
    });

    match rendered {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if e.is_infeasible() {
                error!(error = %e, "no feasible tour");
            } else if e.is_malformed_input() {
                error!(error = %e, "malformed input");
            } else {
                error!(error = %e, "command failed");
            }
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Run the parsed command.
///
/// # Errors
///
/// Returns loading, configuration and infeasibility errors.
pub fn execute(args: &Args) -> TspResult<CommandReport> {
    let config = load_config(&args.common)?;
    let problem = Problem::load(args.command.matrix(), &args.common, &config)?;
    let eval = Evaluator::new(&problem.matrix, problem.policy);

    match &args.command {
        Command::Grasp(a) => grasp(&eval, &config, a),
        Command::Greedy(a) => greedy(&eval, a),
        Command::TwoOpt(a) => two_opt(&eval, a),
        Command::Exact(a) => exact(&eval, a),
    }
}

fn load_config(common: &CommonArgs) -> TspResult<SolverConfig> {
    match &common.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            SolverConfig::from_yaml_file(path)
        }
        None => Ok(SolverConfig::default()),
    }
}

/// Matrix and the policy resolved for this run.
struct Problem {
    matrix: DistanceMatrix,
    policy: NoLinkPolicy,
}

impl Problem {
    /// The policy comes from, in order: CLI flags, the instance file, the
    /// config file.
    fn load(path: &Path, common: &CommonArgs, config: &SolverConfig) -> TspResult<Self> {
        let delimiter = common.delimiter.unwrap_or(config.input.delimiter);
        let loaded = load_any(path, delimiter)?;

        let policy = if common.zero_no_link {
            NoLinkPolicy::ZeroMeansMissing
        } else if let Some(t) = common.no_link_threshold {
            if t.is_nan() {
                return Err(TspError::config("--no-link-threshold must be a number"));
            }
            NoLinkPolicy::from_threshold(t)
        } else if let Some(p) = loaded.policy {
            p
        } else {
            config.no_link_policy()?
        };

        info!(
            instance = %loaded.name,
            path = %path.display(),
            cities = loaded.matrix.len(),
            symmetric = loaded.matrix.is_symmetric(),
            policy = %policy,
            "loaded matrix"
        );
        if let Some(optimum) = loaded.optimal_known {
            info!(optimum, "instance declares a known optimum");
        }

        Ok(Self {
            matrix: loaded.matrix,
            policy,
        })
    }
}

fn secs(flag: &str, value: f64) -> TspResult<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| TspError::config(format!("{flag} must be a non-negative number of seconds")))
}

/// 1-based city label to 0-based index.
fn city_index(label: usize, n: usize) -> TspResult<usize> {
    if label == 0 || label > n {
        return Err(TspError::config(format!(
            "start city {label} is out of range 1..={n}"
        )));
    }
    Ok(label - 1)
}

const fn policy_flag(best_improvement: bool) -> AcceptancePolicy {
    if best_improvement {
        AcceptancePolicy::BestImprovement
    } else {
        AcceptancePolicy::FirstImprovement
    }
}

fn grasp(eval: &Evaluator<'_>, config: &SolverConfig, a: &GraspArgs) -> TspResult<CommandReport> {
    let mut grasp = config.grasp_config()?;
    if let Some(k) = a.rcl_size {
        grasp.rcl_size = k;
    }
    if let Some(t) = a.time_budget {
        grasp.time_budget = secs("--time", t)?;
    }
    if let Some(t) = a.local_search_budget {
        grasp.local_search_time_budget = secs("--local-time", t)?;
    }
    if let Some(seed) = a.seed {
        grasp.seed = Some(seed);
    }
    if let Some(workers) = a.workers {
        grasp.workers = workers;
    }
    if let Some(cap) = a.iterations {
        grasp.max_iterations = Some(cap);
    }
    if let Some(label) = a.start {
        grasp.start = StartCity::Fixed(city_index(label, eval.city_count())?);
    }
    if a.best_improvement {
        grasp.policy = AcceptancePolicy::BestImprovement;
    }

    solve_grasp(eval, &grasp).map(CommandReport::Grasp)
}

fn greedy(eval: &Evaluator<'_>, a: &GreedyArgs) -> TspResult<CommandReport> {
    let n = eval.city_count();
    let ties = if a.random_ties {
        TieBreak::Random
    } else {
        TieBreak::First
    };
    let seed = a.seed.unwrap_or_else(SearchRng::clock_seed);
    if a.random_ties {
        info!(seed, "random tie-breaking");
    }
    let mut rng = SearchRng::new(seed);

    let starts: Vec<usize> = if a.every_start {
        (0..n).collect()
    } else {
        vec![city_index(a.start, n)?]
    };

    let mut best: Option<Solution> = None;
    let mut feasible_starts = 0;
    for &start in &starts {
        match nearest_neighbor(eval, start, ties, &mut rng).feasible() {
            Some(solution) => {
                feasible_starts += 1;
                if best.as_ref().map_or(true, |b| solution.cost() < b.cost()) {
                    best = Some(solution);
                }
            }
            None => warn!(start = start + 1, "greedy walk dead-ended"),
        }
    }

    let solution = best.ok_or_else(|| {
        TspError::infeasible(
            starts.len() as u64,
            "nearest neighbor found no closed tour from the chosen start(s)",
        )
    })?;
    Ok(CommandReport::Greedy(GreedyReport {
        solution,
        ties,
        starts_tried: starts.len(),
        feasible_starts,
    }))
}

fn two_opt(eval: &Evaluator<'_>, a: &TwoOptArgs) -> TspResult<CommandReport> {
    let naive = Solution::evaluate(Tour::identity(eval.city_count()), eval);
    let naive_start = naive.is_some();
    let initial = match naive {
        Some(solution) => solution,
        None => {
            warn!("naive tour uses a missing link, starting from a fallback tour");
            let mut rng = SearchRng::new(0);
            FallbackLadder::default().run(eval, &mut rng)?.solution
        }
    };

    let mut budget = LocalSearchBudget::unbounded();
    if let Some(cap) = a.max_moves {
        budget = budget.with_max_moves(cap);
    }
    let policy = policy_flag(a.best_improvement);
    let outcome = TwoOpt::new(budget).with_policy(policy).run(initial.clone(), eval);
    info!(
        from = initial.cost(),
        to = outcome.solution.cost(),
        moves = outcome.moves,
        "2-opt finished"
    );

    Ok(CommandReport::TwoOpt(TwoOptReport {
        initial,
        naive_start,
        policy,
        outcome,
    }))
}

fn exact(eval: &Evaluator<'_>, a: &ExactArgs) -> TspResult<CommandReport> {
    let method = if a.prune {
        ExactMethod::BranchAndBound
    } else {
        ExactMethod::Enumerate
    };
    let solution = solve_exact(eval, method)?;
    Ok(CommandReport::Exact(ExactReport { method, solution }))
}
