//! GRASP driver: randomized construction plus 2-opt, repeated under a
//! global time budget.
//!
//! Each worker loops independently:
//!
//! 1. build a tour with [`randomized_greedy`],
//! 2. on a dead end reuse the incumbent, or after too many consecutive
//!    failures with no incumbent climb the [`FallbackLadder`] (once; a
//!    failed ladder leaves the worker sampling constructions),
//! 3. improve it with [`TwoOpt`] under the per-iteration budget,
//! 4. offer it to the worker's [`SearchState`].
//!
//! With several workers, each gets its own partition of the seeded RNG and
//! the states are merged at the end.

use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::fallback::{FallbackLadder, FallbackStage};
use super::state::{Improvement, SearchState};
use crate::construct::{randomized_greedy, Construction, StartCity};
use crate::engine::{Deadline, SearchRng};
use crate::error::{TspError, TspResult};
use crate::eval::Evaluator;
use crate::local_search::{AcceptancePolicy, LocalSearchBudget, TwoOpt};
use crate::tour::Solution;

/// GRASP parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GraspConfig {
    /// Restricted Candidate List size `k`.
    pub rcl_size: usize,
    /// Wall-clock budget for the whole search.
    pub time_budget: Duration,
    /// Wall-clock budget for each 2-opt run.
    pub local_search_time_budget: Duration,
    /// Optional cap on iterations per worker.
    pub max_iterations: Option<u64>,
    /// Master seed; derived from the clock when absent.
    pub seed: Option<u64>,
    /// Start city of each construction.
    pub start: StartCity,
    /// 2-opt acceptance policy.
    pub policy: AcceptancePolicy,
    /// Parallel workers.
    pub workers: usize,
    /// Consecutive dead ends, with no incumbent, before the fallback ladder.
    pub max_construction_failures: u64,
    /// Random restarts in the ladder's second stage.
    pub fallback_restarts: u64,
}

impl Default for GraspConfig {
    fn default() -> Self {
        Self {
            rcl_size: 3,
            time_budget: Duration::from_secs(60),
            local_search_time_budget: Duration::from_secs(3),
            max_iterations: None,
            seed: None,
            start: StartCity::Random,
            policy: AcceptancePolicy::FirstImprovement,
            workers: 1,
            max_construction_failures: 25,
            fallback_restarts: FallbackLadder::DEFAULT_RESTARTS,
        }
    }
}

impl GraspConfig {
    /// Set the RCL size.
    #[must_use]
    pub const fn with_rcl_size(mut self, k: usize) -> Self {
        self.rcl_size = k;
        self
    }

    /// Set the global time budget.
    #[must_use]
    pub const fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Set the per-iteration local-search budget.
    #[must_use]
    pub const fn with_local_search_budget(mut self, budget: Duration) -> Self {
        self.local_search_time_budget = budget;
        self
    }

    /// Cap iterations per worker.
    #[must_use]
    pub const fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Pin the master seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the start-city rule.
    #[must_use]
    pub const fn with_start(mut self, start: StartCity) -> Self {
        self.start = start;
        self
    }

    /// Set the 2-opt acceptance policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: AcceptancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the worker count.
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Check ranges.
    ///
    /// # Errors
    ///
    /// Returns [`TspError::Config`] for a zero RCL size, zero budgets, zero
    /// workers or a zero failure threshold.
    pub fn validate(&self) -> TspResult<()> {
        if self.rcl_size == 0 {
            return Err(TspError::config("rcl_size must be at least 1"));
        }
        if self.time_budget.is_zero() {
            return Err(TspError::config("time_budget must be positive"));
        }
        if self.local_search_time_budget.is_zero() {
            return Err(TspError::config("local_search_time_budget must be positive"));
        }
        if self.workers == 0 {
            return Err(TspError::config("workers must be at least 1"));
        }
        if self.max_construction_failures == 0 {
            return Err(TspError::config("max_construction_failures must be at least 1"));
        }
        Ok(())
    }
}

/// Result of a GRASP run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraspReport {
    /// Best solution found.
    pub best: Solution,
    /// Strict improvements across all workers, in chronological order.
    pub history: Vec<Improvement>,
    /// Iterations completed, summed over workers.
    pub iterations: u64,
    /// Construction dead ends, summed over workers.
    pub construction_failures: u64,
    /// Fallback stage that produced a tour, if the ladder was needed.
    pub fallback: Option<FallbackStage>,
    /// Master seed actually used.
    pub seed: u64,
    /// Workers that ran.
    pub workers: usize,
    /// Total wall-clock time.
    #[serde(rename = "elapsed_secs", serialize_with = "as_secs")]
    pub elapsed: Duration,
}

fn as_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Per-worker tallies.
#[derive(Debug, Default)]
struct WorkerRun {
    state: SearchState,
    iterations: u64,
    failures: u64,
    fallback: Option<FallbackStage>,
}

/// Run GRASP on `eval`.
///
/// # Errors
///
/// Returns [`TspError::Config`] if `config` is out of range or names a
/// start city the matrix does not have, and [`TspError::Infeasible`] if
/// the fallback ladder finds no tour.
pub fn solve_grasp(eval: &Evaluator<'_>, config: &GraspConfig) -> TspResult<GraspReport> {
    config.validate()?;
    if let StartCity::Fixed(city) = config.start {
        if city >= eval.city_count() {
            return Err(TspError::config(format!(
                "start city {} is out of range 1..={}",
                city + 1,
                eval.city_count()
            )));
        }
    }

    let seed = match config.seed {
        Some(seed) => seed,
        None => {
            let seed = SearchRng::clock_seed();
            info!(seed, "no seed given, derived one from the clock");
            seed
        }
    };
    info!(
        cities = eval.city_count(),
        rcl_size = config.rcl_size,
        workers = config.workers,
        seed,
        budget_secs = config.time_budget.as_secs_f64(),
        "starting GRASP"
    );

    let deadline = Deadline::after(config.time_budget);
    let mut master = SearchRng::new(seed);
    let rngs = master.partition(config.workers);

    let runs: Vec<WorkerRun> = if config.workers == 1 {
        rngs.into_iter()
            .map(|rng| run_worker(eval, config, &deadline, rng))
            .collect()
    } else {
        rngs.into_par_iter()
            .map(|rng| run_worker(eval, config, &deadline, rng))
            .collect()
    };

    let iterations = runs.iter().map(|r| r.iterations).sum();
    let construction_failures = runs.iter().map(|r| r.failures).sum();
    let mut fallback = runs.iter().find_map(|r| r.fallback);
    let mut state = SearchState::merge(runs.into_iter().map(|r| r.state));

    if state.best().is_none() {
        warn!(iterations, "GRASP ended without a feasible tour, running fallback ladder");
        let outcome = FallbackLadder::new(config.fallback_restarts).run(eval, &mut master)?;
        fallback = Some(outcome.stage);
        state.offer(outcome.solution, iterations, deadline.elapsed());
    }

    let (best, history) = state.into_parts();
    let best = best.ok_or_else(|| TspError::infeasible(iterations, "search produced no tour"))?;
    let elapsed = deadline.elapsed();
    info!(
        cost = best.cost(),
        iterations,
        improvements = history.len(),
        elapsed_secs = elapsed.as_secs_f64(),
        "GRASP finished"
    );

    Ok(GraspReport {
        best,
        history,
        iterations,
        construction_failures,
        fallback,
        seed,
        workers: config.workers,
        elapsed,
    })
}

/// A worker never fails: a ladder that finds nothing only stops the worker
/// from climbing it again. Infeasibility is decided after the merge.
fn run_worker(
    eval: &Evaluator<'_>,
    config: &GraspConfig,
    deadline: &Deadline,
    mut rng: SearchRng,
) -> WorkerRun {
    let n = eval.city_count();
    let worker = rng.stream();
    let ladder = FallbackLadder::new(config.fallback_restarts);

    let mut run = WorkerRun::default();
    let mut consecutive_failures = 0u64;
    let mut ladder_exhausted = false;

    while !deadline.expired() && config.max_iterations.map_or(true, |cap| run.iterations < cap) {
        run.iterations += 1;
        let start = config.start.pick(n, &mut rng);

        let seed_solution = match randomized_greedy(eval, start, config.rcl_size, &mut rng) {
            Construction::Feasible(solution) => {
                consecutive_failures = 0;
                solution
            }
            Construction::DeadEnd { at, visited } => {
                run.failures += 1;
                debug!(worker, iteration = run.iterations, at, visited, "construction dead end");
                if let Some(best) = run.state.best() {
                    best.clone()
                } else {
                    consecutive_failures += 1;
                    if ladder_exhausted || consecutive_failures < config.max_construction_failures {
                        continue;
                    }
                    warn!(worker, consecutive_failures, "no feasible construction yet, running fallback ladder");
                    consecutive_failures = 0;
                    match ladder.run(eval, &mut rng) {
                        Ok(outcome) => {
                            run.fallback = Some(outcome.stage);
                            outcome.solution
                        }
                        Err(e) => {
                            warn!(worker, error = %e, "fallback ladder failed, worker keeps sampling constructions");
                            ladder_exhausted = true;
                            continue;
                        }
                    }
                }
            }
        };

        // 2-opt never runs past the global deadline
        let budget = deadline
            .remaining()
            .map_or(config.local_search_time_budget, |left| left.min(config.local_search_time_budget));
        let improved = TwoOpt::new(LocalSearchBudget::timed(budget))
            .with_policy(config.policy)
            .run(seed_solution, eval);
        let cost = improved.solution.cost();
        if run.state.offer(improved.solution, run.iterations, deadline.elapsed()) {
            info!(worker, iteration = run.iterations, cost, moves = improved.moves, "new best tour");
        }
    }

    debug!(worker, iterations = run.iterations, failures = run.failures, "worker finished");
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_search::is_two_opt_optimal;
    use crate::matrix::{DistanceMatrix, NoLinkPolicy};

    const X: f64 = 1000.0;

    fn euclidean(n: usize, seed: u64) -> DistanceMatrix {
        let mut rng = SearchRng::new(seed);
        let pts: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.gen_f64() * 100.0, rng.gen_f64() * 100.0))
            .collect();
        DistanceMatrix::from_rows(
            pts.iter()
                .map(|a| {
                    pts.iter()
                        .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                        .collect()
                })
                .collect(),
        )
        .expect("valid")
    }

    fn quick(iterations: u64) -> GraspConfig {
        GraspConfig::default()
            .with_seed(42)
            .with_max_iterations(iterations)
            .with_time_budget(Duration::from_secs(30))
    }

    #[test]
    fn test_default_config() {
        let c = GraspConfig::default();
        assert_eq!(c.rcl_size, 3);
        assert_eq!(c.time_budget, Duration::from_secs(60));
        assert_eq!(c.local_search_time_budget, Duration::from_secs(3));
        assert_eq!(c.workers, 1);
        assert_eq!(c.max_construction_failures, 25);
        assert_eq!(c.fallback_restarts, 100);
        assert_eq!(c.start, StartCity::Random);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GraspConfig::default().with_rcl_size(0).validate().is_err());
        assert!(GraspConfig::default().with_time_budget(Duration::ZERO).validate().is_err());
        assert!(GraspConfig::default()
            .with_local_search_budget(Duration::ZERO)
            .validate()
            .is_err());
        assert!(GraspConfig::default().with_workers(0).validate().is_err());

        let m = euclidean(5, 1);
        let eval = Evaluator::new(&m, NoLinkPolicy::unrestricted());
        let err = solve_grasp(&eval, &GraspConfig::default().with_rcl_size(0)).unwrap_err();
        assert!(matches!(err, TspError::Config { .. }));
    }

    #[test]
    fn test_finds_local_optimum_and_history_decreases() {
        let m = euclidean(15, 9);
        let eval = Evaluator::new(&m, NoLinkPolicy::unrestricted());
        let report = solve_grasp(&eval, &quick(30)).expect("feasible");

        assert_eq!(report.iterations, 30);
        assert_eq!(report.seed, 42);
        assert!(report.fallback.is_none());
        assert!(is_two_opt_optimal(&report.best, &eval));
        assert!((eval.cost(report.best.tour().path()) - report.best.cost()).abs() < 1e-9);

        assert!(!report.history.is_empty());
        for pair in report.history.windows(2) {
            assert!(pair[1].cost < pair[0].cost);
            assert!(pair[1].elapsed >= pair[0].elapsed);
        }
        let last = report.history.last().expect("non-empty");
        assert!((last.cost - report.best.cost()).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_result() {
        let m = euclidean(18, 4);
        let eval = Evaluator::new(&m, NoLinkPolicy::unrestricted());
        let a = solve_grasp(&eval, &quick(20)).expect("feasible");
        let b = solve_grasp(&eval, &quick(20)).expect("feasible");
        assert_eq!(a.best, b.best);
        let costs = |r: &GraspReport| r.history.iter().map(|h| h.cost).collect::<Vec<_>>();
        assert_eq!(costs(&a), costs(&b));
    }

    #[test]
    fn test_parallel_workers_reproducible() {
        let m = euclidean(16, 2);
        let eval = Evaluator::new(&m, NoLinkPolicy::unrestricted());
        let config = quick(10).with_workers(3);
        let a = solve_grasp(&eval, &config).expect("feasible");
        let b = solve_grasp(&eval, &config).expect("feasible");
        assert_eq!(a.iterations, 30);
        assert_eq!(a.workers, 3);
        assert!((a.best.cost() - b.best.cost()).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_start_city_kept() {
        let m = euclidean(10, 5);
        let eval = Evaluator::new(&m, NoLinkPolicy::unrestricted());
        let report = solve_grasp(&eval, &quick(5).with_start(StartCity::Fixed(4))).expect("feasible");
        assert_eq!(report.best.tour().start(), 4);

        let err = solve_grasp(&eval, &quick(5).with_start(StartCity::Fixed(10))).unwrap_err();
        assert!(matches!(err, TspError::Config { .. }));
    }

    #[test]
    fn test_disconnected_instance_is_infeasible() {
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 2.0, X, X],
            vec![1.0, 0.0, 1.0, X, X],
            vec![2.0, 1.0, 0.0, X, X],
            vec![X, X, X, 0.0, 1.0],
            vec![X, X, X, 1.0, 0.0],
        ])
        .expect("valid");
        let eval = Evaluator::new(&m, NoLinkPolicy::Threshold(X));
        let err = solve_grasp(&eval, &quick(100)).unwrap_err();
        assert!(err.is_infeasible());
    }

    #[test]
    fn test_ladder_runs_after_loop_without_incumbent() {
        // Too few iterations to hit the failure threshold inside the loop
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 1.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0, 1.0, X],
            vec![1.0, 1.0, 0.0, 2.0, 2.0],
            vec![1.0, 1.0, 2.0, 0.0, X],
            vec![1.0, X, 2.0, X, 0.0],
        ])
        .expect("valid");
        let eval = Evaluator::new(&m, NoLinkPolicy::Threshold(X));
        let mut config = quick(1).with_rcl_size(1).with_start(StartCity::Fixed(0));
        config.fallback_restarts = 1000;
        let report = solve_grasp(&eval, &config).expect("feasible");
        assert_eq!(report.construction_failures, 1);
        assert_eq!(report.fallback, Some(FallbackStage::RandomRestarts));
        assert_eq!(report.history.len(), 1);
    }

    /// Every nearest-neighbor walk dead-ends, so the ladder always fails,
    /// yet k = 3 sampling closes a tour about one time in eight.
    fn ladder_proof_cycle() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 59.0, 22.0, X, 80.0, 66.0],
            vec![59.0, 0.0, 5.0, 49.0, X, 45.0],
            vec![22.0, 5.0, 0.0, X, X, 74.0],
            vec![X, 49.0, X, 0.0, X, 56.0],
            vec![80.0, X, X, X, 0.0, 76.0],
            vec![66.0, 45.0, 74.0, 56.0, 76.0, 0.0],
        ])
        .expect("valid")
    }

    #[test]
    fn test_failed_worker_ladder_does_not_abort_search() {
        let m = ladder_proof_cycle();
        let eval = Evaluator::new(&m, NoLinkPolicy::Threshold(X));
        let mut rng = SearchRng::new(0);
        assert!(FallbackLadder::default().run(&eval, &mut rng).is_err());

        for seed in 0..20 {
            let mut config = quick(200).with_seed(seed);
            config.max_construction_failures = 1;
            let report = solve_grasp(&eval, &config).expect("k = 3 sampling finds the cycle");
            assert!(report.best.cost() >= 288.0 - 1e-9, "seed {seed}");
            assert!((eval.cost(report.best.tour().path()) - report.best.cost()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_parallel_workers_report_feasible_when_any_worker_succeeds() {
        let m = ladder_proof_cycle();
        let eval = Evaluator::new(&m, NoLinkPolicy::Threshold(X));
        for seed in 0..10 {
            let report = solve_grasp(&eval, &quick(200).with_seed(seed).with_workers(16))
                .expect("some worker samples the cycle");
            assert!(report.best.cost() >= 288.0 - 1e-9, "seed {seed}");
            assert_eq!(report.iterations, 16 * 200);
        }
    }

    #[test]
    fn test_time_budget_stops_uncapped_search() {
        let m = euclidean(25, 8);
        let eval = Evaluator::new(&m, NoLinkPolicy::unrestricted());
        let budget = Duration::from_millis(200);
        let config = GraspConfig::default()
            .with_seed(3)
            .with_time_budget(budget)
            .with_local_search_budget(Duration::from_millis(50));
        assert!(config.max_iterations.is_none());

        let report = solve_grasp(&eval, &config).expect("budget exhaustion is not an error");
        assert!(report.iterations > 0);
        assert!(report.elapsed >= budget);
        assert!(report.elapsed < budget + Duration::from_millis(500), "{:?}", report.elapsed);

        let last = report.history.last().expect("at least one improvement");
        assert_eq!(&last.tour, report.best.tour());
        assert!((last.cost - report.best.cost()).abs() < 1e-12);
        assert!(report.history.iter().all(|h| h.elapsed <= report.elapsed));
    }

    #[test]
    fn test_local_search_budget_applies_per_iteration() {
        // With a 1 ns budget 2-opt stops after at most one move, leaving the
        // nearest-neighbor tour of 60 random points far from 2-opt optimal
        let m = euclidean(60, 11);
        let eval = Evaluator::new(&m, NoLinkPolicy::unrestricted());
        let starved = quick(3)
            .with_rcl_size(1)
            .with_start(StartCity::Fixed(0))
            .with_local_search_budget(Duration::from_nanos(1));
        let report = solve_grasp(&eval, &starved).expect("feasible");
        assert!(!is_two_opt_optimal(&report.best, &eval));

        let relaxed = starved.with_local_search_budget(Duration::from_secs(10));
        let report = solve_grasp(&eval, &relaxed).expect("feasible");
        assert!(is_two_opt_optimal(&report.best, &eval));
    }

    #[test]
    fn test_report_serializes() {
        let m = euclidean(6, 3);
        let eval = Evaluator::new(&m, NoLinkPolicy::unrestricted());
        let report = solve_grasp(&eval, &quick(3)).expect("feasible");
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["seed"], serde_json::json!(42));
        assert!(json["best"]["cost"].is_number());
        assert!(json["elapsed_secs"].is_number());
        assert!(json["fallback"].is_null());
        assert_eq!(json["best"]["tour"].as_array().map(Vec::len), Some(7));
    }
}
