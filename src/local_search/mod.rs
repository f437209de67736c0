//! Local search over tours.
//!
//! Only the 2-opt neighborhood is implemented: reverse a contiguous segment
//! of the tour, keeping the start city fixed.

pub mod two_opt;

pub use two_opt::{is_two_opt_optimal, TwoOpt};

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::tour::Solution;

/// Minimum cost decrease for a move to count as an improvement.
pub const IMPROVEMENT_EPS: f64 = 1e-9;

/// Which improving move a scan applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// First improving move in `(i, k)` lexicographic order, then rescan.
    #[default]
    FirstImprovement,
    /// Most improving move of the whole neighborhood.
    BestImprovement,
}

/// Limits on one local-search run. Checked between scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalSearchBudget {
    /// Stop after this many applied moves.
    pub max_moves: Option<u64>,
    /// Stop once this much wall-clock time has passed.
    pub time_limit: Option<Duration>,
}

impl LocalSearchBudget {
    /// Run until a local optimum.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_moves: None,
            time_limit: None,
        }
    }

    /// Wall-clock bound only.
    #[must_use]
    pub const fn timed(limit: Duration) -> Self {
        Self {
            max_moves: None,
            time_limit: Some(limit),
        }
    }

    /// Cap the number of applied moves.
    #[must_use]
    pub const fn with_max_moves(mut self, moves: u64) -> Self {
        self.max_moves = Some(moves);
        self
    }

    /// Cap the wall-clock time.
    #[must_use]
    pub const fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// One applied 2-opt move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoveRecord {
    /// First reversed position (0-based).
    pub i: usize,
    /// Last reversed position (0-based, inclusive).
    pub k: usize,
    /// Tour cost after the move.
    pub cost: f64,
}

/// Result of a local-search run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalSearchOutcome {
    /// Final solution; its cost never exceeds the input's.
    pub solution: Solution,
    /// Applied moves.
    pub moves: u64,
    /// Neighborhood scans started.
    pub scans: u64,
    /// A full scan found no improving move. False when the budget ran out
    /// or a move was rejected by the full recompute.
    pub reached_local_optimum: bool,
    /// One entry per applied move, in order. Costs strictly decrease.
    pub trace: Vec<MoveRecord>,
}
