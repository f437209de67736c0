//! Best-so-far tracking with an improvement history.

use serde::{Serialize, Serializer};
use std::time::Duration;

use crate::local_search::IMPROVEMENT_EPS;
use crate::tour::{Solution, Tour};

/// A strict improvement of the incumbent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Improvement {
    /// Snapshot of the improving tour.
    pub tour: Tour,
    /// Its cost.
    pub cost: f64,
    /// Iteration (1-based, per worker) that produced it.
    pub iteration: u64,
    /// Time since the search started.
    #[serde(rename = "elapsed_secs", serialize_with = "as_secs")]
    pub elapsed: Duration,
}

fn as_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Incumbent solution and the chronological record of how it was reached.
///
/// The best cost never increases: [`SearchState::offer`] only accepts
/// candidates cheaper by more than [`IMPROVEMENT_EPS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    best: Option<Solution>,
    history: Vec<Improvement>,
}

impl SearchState {
    /// Empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `candidate` if it strictly improves the incumbent.
    ///
    /// Returns whether it was accepted.
    pub fn offer(&mut self, candidate: Solution, iteration: u64, elapsed: Duration) -> bool {
        let better = self
            .best
            .as_ref()
            .map_or(true, |best| candidate.improves_on(best, IMPROVEMENT_EPS));
        if !better {
            return false;
        }

        self.history.push(Improvement {
            tour: candidate.tour().clone(),
            cost: candidate.cost(),
            iteration,
            elapsed,
        });
        self.best = Some(candidate);
        true
    }

    /// Current incumbent.
    #[must_use]
    pub const fn best(&self) -> Option<&Solution> {
        self.best.as_ref()
    }

    /// Cost of the incumbent.
    #[must_use]
    pub fn best_cost(&self) -> Option<f64> {
        self.best.as_ref().map(Solution::cost)
    }

    /// Improvements in the order they happened.
    #[must_use]
    pub fn history(&self) -> &[Improvement] {
        &self.history
    }

    /// Split into incumbent and history.
    #[must_use]
    pub fn into_parts(self) -> (Option<Solution>, Vec<Improvement>) {
        (self.best, self.history)
    }

    /// Combine per-worker states.
    ///
    /// All histories are interleaved by elapsed time and replayed, so the
    /// merged history keeps only entries that improved on everything found
    /// before them by any worker.
    #[must_use]
    pub fn merge(states: impl IntoIterator<Item = Self>) -> Self {
        let mut entries: Vec<Improvement> = states
            .into_iter()
            .flat_map(|state| state.history)
            .collect();
        entries.sort_by(|a, b| {
            a.elapsed
                .cmp(&b.elapsed)
                .then_with(|| a.iteration.cmp(&b.iteration))
        });

        let mut merged = Self::new();
        for entry in entries {
            let candidate = Solution::from_parts(entry.tour, entry.cost);
            merged.offer(candidate, entry.iteration, entry.elapsed);
        }
        merged
    }
}
