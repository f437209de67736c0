//! Metaheuristic search: GRASP, its incumbent state and the connectivity
//! fallback.

pub mod fallback;
pub mod grasp;
pub mod state;

pub use fallback::{FallbackLadder, FallbackOutcome, FallbackStage};
pub use grasp::{solve_grasp, GraspConfig, GraspReport};
pub use state::{Improvement, SearchState};
