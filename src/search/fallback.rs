//! Connectivity fallback for partially disconnected distance graphs.
//!
//! When randomized construction keeps dead-ending, the ladder tries
//! progressively wider searches before declaring the instance infeasible:
//!
//! 1. nearest neighbor (lowest-index ties) from every start city,
//! 2. `restarts` nearest-neighbor runs from random starts with random ties,
//! 3. [`TspError::Infeasible`].

use serde::Serialize;
use std::fmt;
use tracing::{error, info, warn};

use crate::construct::{nearest_neighbor, TieBreak};
use crate::engine::SearchRng;
use crate::error::{TspError, TspResult};
use crate::eval::Evaluator;
use crate::tour::Solution;

/// Which rung of the ladder produced a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStage {
    /// Deterministic greedy from every start.
    EveryStart,
    /// Random-start, random-tie greedy restarts.
    RandomRestarts,
}

impl fmt::Display for FallbackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EveryStart => f.write_str("every-start greedy"),
            Self::RandomRestarts => f.write_str("random restarts"),
        }
    }
}

/// A tour recovered by the ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    /// Cheapest feasible tour of the successful stage.
    pub solution: Solution,
    /// Stage that found it.
    pub stage: FallbackStage,
    /// Constructions attempted across all stages.
    pub attempts: u64,
}

/// Ordered recovery strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackLadder {
    /// Random restarts in the second stage.
    pub restarts: u64,
}

impl Default for FallbackLadder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RESTARTS)
    }
}

impl FallbackLadder {
    /// Default number of random restarts.
    pub const DEFAULT_RESTARTS: u64 = 100;

    /// Ladder with `restarts` random restarts.
    #[must_use]
    pub const fn new(restarts: u64) -> Self {
        Self { restarts }
    }

    /// Climb the ladder until a stage finds a feasible tour.
    ///
    /// # Errors
    ///
    /// Returns [`TspError::Infeasible`] if no stage produces a tour.
    pub fn run(&self, eval: &Evaluator<'_>, rng: &mut SearchRng) -> TspResult<FallbackOutcome> {
        let n = eval.city_count();
        let mut attempts = 0u64;

        info!(starts = n, "fallback: greedy from every start city");
        let mut best = None;
        for start in 0..n {
            attempts += 1;
            if let Some(candidate) = nearest_neighbor(eval, start, TieBreak::First, rng).feasible() {
                keep_cheaper(&mut best, candidate);
            }
        }
        if let Some(solution) = best {
            info!(cost = solution.cost(), "fallback: every-start greedy succeeded");
            return Ok(FallbackOutcome {
                solution,
                stage: FallbackStage::EveryStart,
                attempts,
            });
        }

        warn!(restarts = self.restarts, "fallback: every-start greedy failed, trying random restarts");
        for _ in 0..self.restarts {
            attempts += 1;
            let start = rng.gen_index(n);
            if let Some(candidate) = nearest_neighbor(eval, start, TieBreak::Random, rng).feasible() {
                keep_cheaper(&mut best, candidate);
            }
        }
        if let Some(solution) = best {
            info!(cost = solution.cost(), "fallback: random restarts succeeded");
            return Ok(FallbackOutcome {
                solution,
                stage: FallbackStage::RandomRestarts,
                attempts,
            });
        }

        error!(attempts, "fallback: no feasible tour exists under the no-link rule");
        Err(TspError::infeasible(
            attempts,
            "no start city and no random restart produced a closed tour",
        ))
    }
}

fn keep_cheaper(best: &mut Option<Solution>, candidate: Solution) {
    if best.as_ref().map_or(true, |b| candidate.cost() < b.cost()) {
        *best = Some(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{DistanceMatrix, NoLinkPolicy};

    const X: f64 = 1000.0;

    #[test]
    fn test_every_start_finds_only_cycle() {
        // 1-3 is missing, so 0-1-2-3-0 is the only Hamiltonian cycle
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 2.0, 5.0],
            vec![1.0, 0.0, 1.0, X],
            vec![2.0, 1.0, 0.0, 1.0],
            vec![5.0, X, 1.0, 0.0],
        ])
        .expect("valid");
        let eval = Evaluator::new(&m, NoLinkPolicy::Threshold(X));
        let mut rng = SearchRng::new(0);
        let outcome = FallbackLadder::default().run(&eval, &mut rng).expect("feasible");
        assert_eq!(outcome.stage, FallbackStage::EveryStart);
        assert_eq!(outcome.attempts, 4);
        assert!((outcome.solution.cost() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_disconnected_clusters_infeasible() {
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, X, X],
            vec![1.0, 0.0, X, X],
            vec![X, X, 0.0, 1.0],
            vec![X, X, 1.0, 0.0],
        ])
        .expect("valid");
        let eval = Evaluator::new(&m, NoLinkPolicy::Threshold(X));
        let mut rng = SearchRng::new(3);
        let err = FallbackLadder::new(10).run(&eval, &mut rng).unwrap_err();
        assert!(err.is_infeasible());
        assert!(matches!(err, TspError::Infeasible { attempts: 14, .. }));
    }

    #[test]
    fn test_random_restarts_rescue_bad_ties() {
        // City 4 only links to 0 and 2. Lowest-index ties dead-end from
        // every start; other tie choices close 0-4-2 into a cycle.
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 1.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0, 1.0, X],
            vec![1.0, 1.0, 0.0, 2.0, 2.0],
            vec![1.0, 1.0, 2.0, 0.0, X],
            vec![1.0, X, 2.0, X, 0.0],
        ])
        .expect("valid");
        let eval = Evaluator::new(&m, NoLinkPolicy::Threshold(X));
        let mut rng = SearchRng::new(0);
        for start in 0..5 {
            assert!(!nearest_neighbor(&eval, start, TieBreak::First, &mut rng).is_feasible());
        }

        let outcome = FallbackLadder::new(1000).run(&eval, &mut rng).expect("feasible");
        assert_eq!(outcome.stage, FallbackStage::RandomRestarts);
        assert_eq!(outcome.attempts, 1005);
        // Two cycles exist: 0-4-2-1-3-0 (6) and 0-4-2-3-1-0 (7)
        let cost = outcome.solution.cost();
        assert!((cost - 6.0).abs() < 1e-12 || (cost - 7.0).abs() < 1e-12, "cost {cost}");
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(FallbackStage::EveryStart.to_string(), "every-start greedy");
        assert_eq!(FallbackStage::RandomRestarts.to_string(), "random restarts");
    }
}
