//! # tsp-grasp
//!
//! Heuristics for the Traveling Salesman Problem over a distance matrix in
//! which some edges may not exist.
//!
//! - Nearest-neighbor and randomized greedy construction
//! - 2-opt local search with first- or best-improvement acceptance
//! - GRASP: repeated randomized construction plus 2-opt under a time budget,
//!   optionally across parallel workers
//! - An exhaustive oracle for small instances
//!
//! Missing links are decided by an explicit [`matrix::NoLinkPolicy`], never
//! by a magic number hidden in the matrix.
//!
//! ## Example
//!
//! ```rust
//! use tsp_grasp::prelude::*;
//!
//! let matrix = DistanceMatrix::from_rows(vec![
//!     vec![0.0, 1.0, 4.0, 1.0],
//!     vec![1.0, 0.0, 1.0, 4.0],
//!     vec![4.0, 1.0, 0.0, 1.0],
//!     vec![1.0, 4.0, 1.0, 0.0],
//! ])
//! .unwrap();
//! let eval = Evaluator::new(&matrix, NoLinkPolicy::default());
//!
//! let config = GraspConfig::default().with_seed(7).with_max_iterations(10);
//! let report = solve_grasp(&eval, &config).unwrap();
//! assert_eq!(report.best.cost(), 4.0);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Index loops mirror the 2-opt position notation
)]

pub mod cli;
pub mod config;
pub mod construct;
pub mod engine;
pub mod error;
pub mod eval;
pub mod exact;
pub mod local_search;
pub mod matrix;
pub mod search;
pub mod tour;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::SolverConfig;
    pub use crate::construct::{nearest_neighbor, randomized_greedy, Construction, StartCity, TieBreak};
    pub use crate::engine::{Deadline, SearchRng};
    pub use crate::error::{TspError, TspResult};
    pub use crate::eval::{tour_cost, Evaluator};
    pub use crate::exact::{solve_exact, ExactMethod};
    pub use crate::local_search::{AcceptancePolicy, LocalSearchBudget, LocalSearchOutcome, TwoOpt};
    pub use crate::matrix::{load_any, load_matrix, DistanceMatrix, NoLinkPolicy};
    pub use crate::search::{solve_grasp, FallbackLadder, GraspConfig, GraspReport};
    pub use crate::tour::{Solution, Tour};
}

/// Re-export for public API
pub use error::{TspError, TspResult};
