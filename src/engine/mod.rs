//! Search plumbing shared by every solver.
//!
//! - Deterministic RNG (PCG with partitioned seeds)
//! - Cooperative wall-clock deadlines

pub mod clock;
pub mod rng;

pub use clock::Deadline;
pub use rng::SearchRng;
