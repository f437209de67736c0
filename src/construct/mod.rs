//! Constructive heuristics.
//!
//! Both builders grow a path from a start city and return a [`Construction`]:
//! either a feasible closed [`Solution`] or a dead end. A dead end means the
//! unvisited remainder is unreachable under the no-link policy. It is a
//! normal outcome, recovered by the fallback ladder, not an error.

pub mod grasp;
pub mod nearest;

pub use grasp::randomized_greedy;
pub use nearest::nearest_neighbor;

use serde::{Deserialize, Serialize};

use crate::engine::SearchRng;
use crate::eval::Evaluator;
use crate::tour::{Solution, Tour};

/// How a tie between equally near candidates is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Lowest city index wins (deterministic).
    #[default]
    First,
    /// Uniform among the tied candidates.
    Random,
}

/// Where a construction starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartCity {
    /// Always the given 0-based city.
    Fixed(usize),
    /// Uniformly random per construction.
    #[default]
    Random,
}

impl StartCity {
    /// Resolve to a concrete city.
    ///
    /// A fixed city must already be checked against `n`; the solver entry
    /// points reject out-of-range starts as configuration errors.
    pub fn pick(self, n: usize, rng: &mut SearchRng) -> usize {
        match self {
            Self::Fixed(city) => {
                debug_assert!(city < n, "start city {city} out of range for {n} cities");
                city
            }
            Self::Random => rng.gen_index(n),
        }
    }
}

/// Outcome of one construction attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Construction {
    /// Every city visited and the closing edge exists.
    Feasible(Solution),
    /// No allowed edge leaves `at` towards an unvisited city, or the
    /// closing edge back to the start is forbidden.
    DeadEnd {
        /// City where the walk got stuck.
        at: usize,
        /// Number of cities visited before getting stuck.
        visited: usize,
    },
}

impl Construction {
    /// The solution, if feasible.
    #[must_use]
    pub fn feasible(self) -> Option<Solution> {
        match self {
            Self::Feasible(solution) => Some(solution),
            Self::DeadEnd { .. } => None,
        }
    }

    /// Whether the attempt produced a tour.
    #[must_use]
    pub const fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible(_))
    }
}

/// Shared walk: repeatedly ask `next` for the following city.
///
/// `next(current, visited)` returns `None` when no allowed unvisited city
/// remains. The closing edge is checked before a tour is returned, so a
/// feasible construction always has a finite cost.
pub(crate) fn walk<F>(eval: &Evaluator<'_>, start: usize, mut next: F) -> Construction
where
    F: FnMut(usize, &[bool]) -> Option<usize>,
{
    let n = eval.city_count();
    let mut visited = vec![false; n];
    let mut path = Vec::with_capacity(n + 1);
    let mut cost = 0.0;

    visited[start] = true;
    path.push(start);
    let mut current = start;

    while path.len() < n {
        let Some(city) = next(current, &visited) else {
            return Construction::DeadEnd {
                at: current,
                visited: path.len(),
            };
        };
        let Some(d) = eval.edge(current, city) else {
            return Construction::DeadEnd {
                at: current,
                visited: path.len(),
            };
        };
        cost += d;
        visited[city] = true;
        path.push(city);
        current = city;
    }

    let Some(closing) = eval.edge(current, start) else {
        return Construction::DeadEnd {
            at: current,
            visited: path.len(),
        };
    };
    cost += closing;
    path.push(start);

    Construction::Feasible(Solution::from_parts(Tour::from_closed_unchecked(path), cost))
}

/// Allowed, unvisited neighbours of `current` with their distances.
pub(crate) fn candidates<'a>(
    eval: &'a Evaluator<'a>,
    current: usize,
    visited: &'a [bool],
) -> impl Iterator<Item = (usize, f64)> + 'a {
    visited
        .iter()
        .enumerate()
        .filter(|(_, &seen)| !seen)
        .filter_map(move |(city, _)| eval.edge(current, city).map(|d| (city, d)))
}
