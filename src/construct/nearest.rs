//! Nearest-neighbor greedy construction.
//!
//! From the start city, repeatedly move to the closest allowed unvisited
//! city, then close the tour. Deterministic under [`TieBreak::First`].

use super::{candidates, walk, Construction, TieBreak};
use crate::engine::SearchRng;
use crate::eval::Evaluator;

/// Build a tour by always taking the nearest allowed unvisited city.
///
/// Returns [`Construction::DeadEnd`] when the walk gets stuck or the
/// closing edge back to `start` is forbidden.
///
/// `rng` is only consulted under [`TieBreak::Random`] when two or more
/// candidates are equally near.
///
/// # Panics
///
/// Panics if `start` is not a valid city index.
#[allow(clippy::float_cmp)]
pub fn nearest_neighbor(
    eval: &Evaluator<'_>,
    start: usize,
    ties: TieBreak,
    rng: &mut SearchRng,
) -> Construction {
    let mut tied: Vec<usize> = Vec::new();

    walk(eval, start, |current, visited| {
        let mut best = f64::INFINITY;
        tied.clear();
        for (city, d) in candidates(eval, current, visited) {
            if d < best {
                best = d;
                tied.clear();
                tied.push(city);
            } else if d == best {
                tied.push(city);
            }
        }

        match ties {
            TieBreak::First => tied.first().copied(),
            TieBreak::Random => rng.choose(&tied).copied(),
        }
    })
}
