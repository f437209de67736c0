//! GRASP randomized-greedy construction.
//!
//! At each step the allowed unvisited cities are ranked by distance from the
//! current city. The next city is drawn uniformly from the `k` nearest, the
//! Restricted Candidate List (RCL). With `k = 1` no randomness is drawn and
//! the result equals nearest neighbor with [`super::TieBreak::First`].

use super::{candidates, walk, Construction};
use crate::engine::SearchRng;
use crate::eval::Evaluator;

/// Build a tour by sampling each step from the `rcl_size` nearest candidates.
///
/// Equal distances keep index order, so the RCL is deterministic for a given
/// state and the draw is the only source of randomness. `rcl_size` of 0 is
/// treated as 1.
///
/// # Panics
///
/// Panics if `start` is not a valid city index.
pub fn randomized_greedy(
    eval: &Evaluator<'_>,
    start: usize,
    rcl_size: usize,
    rng: &mut SearchRng,
) -> Construction {
    let k = rcl_size.max(1);
    let mut ranked: Vec<(usize, f64)> = Vec::with_capacity(eval.city_count());

    walk(eval, start, |current, visited| {
        ranked.clear();
        ranked.extend(candidates(eval, current, visited));
        if ranked.is_empty() {
            return None;
        }

        // Stable: ties stay in index order
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        let rcl = &ranked[..k.min(ranked.len())];
        Some(rcl[rng.gen_index(rcl.len())].0)
    })
}
