//! Brute-force oracle for small instances.
//!
//! City 0 is fixed as the start, so `(n - 1)!` tours are considered. Used to
//! validate the heuristics, never on realistic sizes.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{TspError, TspResult};
use crate::eval::Evaluator;
use crate::tour::{Solution, Tour};

/// Largest instance the oracle accepts.
pub const EXACT_MAX_CITIES: usize = 13;

/// How the oracle explores the permutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExactMethod {
    /// Evaluate every permutation in full.
    #[default]
    Enumerate,
    /// Depth-first with forbidden-edge skipping and cost-bound pruning.
    BranchAndBound,
}

/// Optimal tour starting and ending at city 0.
///
/// # Errors
///
/// Returns [`TspError::InstanceTooLarge`] above [`EXACT_MAX_CITIES`] and
/// [`TspError::Infeasible`] if no permutation avoids forbidden edges.
pub fn solve_exact(eval: &Evaluator<'_>, method: ExactMethod) -> TspResult<Solution> {
    let n = eval.city_count();
    if n > EXACT_MAX_CITIES {
        return Err(TspError::InstanceTooLarge {
            n,
            max: EXACT_MAX_CITIES,
        });
    }

    info!(cities = n, ?method, "exact search");
    let found = match method {
        ExactMethod::Enumerate => enumerate(eval),
        ExactMethod::BranchAndBound => BranchAndBound::new(eval).solve(),
    };

    let (path, cost) = found.ok_or_else(|| {
        TspError::infeasible(
            factorial(n - 1),
            "no permutation of the cities avoids a missing link",
        )
    })?;
    debug!(cost, "exact optimum");
    Ok(Solution::from_parts(Tour::from_closed_unchecked(path), cost))
}

fn factorial(k: usize) -> u64 {
    (1..=k as u64).product()
}

fn enumerate(eval: &Evaluator<'_>) -> Option<(Vec<usize>, f64)> {
    let n = eval.city_count();
    let mut path = vec![0; n + 1];
    let mut best: Option<(Vec<usize>, f64)> = None;

    for perm in (1..n).permutations(n - 1) {
        path[1..n].copy_from_slice(&perm);
        let cost = eval.cost(&path);
        if cost.is_finite() && best.as_ref().map_or(true, |(_, b)| cost < *b) {
            best = Some((path.clone(), cost));
        }
    }
    best
}

/// Depth-first search state.
struct BranchAndBound<'e, 'm> {
    eval: &'e Evaluator<'m>,
    path: Vec<usize>,
    visited: Vec<bool>,
    best_cost: f64,
    best_path: Option<Vec<usize>>,
}

impl<'e, 'm> BranchAndBound<'e, 'm> {
    fn new(eval: &'e Evaluator<'m>) -> Self {
        let n = eval.city_count();
        let mut visited = vec![false; n];
        visited[0] = true;
        let mut path = Vec::with_capacity(n + 1);
        path.push(0);
        Self {
            eval,
            path,
            visited,
            best_cost: f64::INFINITY,
            best_path: None,
        }
    }

    fn solve(mut self) -> Option<(Vec<usize>, f64)> {
        self.extend(0, 0.0);
        let cost = self.best_cost;
        self.best_path.map(|path| (path, cost))
    }

    fn extend(&mut self, current: usize, partial: f64) {
        let n = self.visited.len();
        if self.path.len() == n {
            if let Some(closing) = self.eval.edge(current, 0) {
                let total = partial + closing;
                if total < self.best_cost {
                    self.best_cost = total;
                    let mut closed = self.path.clone();
                    closed.push(0);
                    self.best_path = Some(closed);
                }
            }
            return;
        }

        for next in 1..n {
            if self.visited[next] {
                continue;
            }
            let Some(d) = self.eval.edge(current, next) else {
                continue;
            };
            let cost = partial + d;
            if cost >= self.best_cost {
                continue;
            }

            self.visited[next] = true;
            self.path.push(next);
            self.extend(next, cost);
            self.path.pop();
            self.visited[next] = false;
        }
    }
}
