//! Tour cost evaluation.
//!
//! This is the hot path of every search: it is called O(n) times per 2-opt
//! scan and never allocates.
//!
//! # Governing Equation
//!
//! ```text
//! L(π) = Σᵢ d(π(i), π(i+1))      if every edge is allowed
//! L(π) = +∞                       otherwise (first forbidden edge short-circuits)
//! ```

use crate::matrix::{DistanceMatrix, NoLinkPolicy};

/// Sum of consecutive edge lengths along `path`.
///
/// `path` may be open or closed; a closed tour simply repeats its start at
/// the end. Returns `+∞` as soon as an edge is forbidden by `policy`. Paths
/// shorter than two cities have no edges and cost 0.
///
/// # Panics
///
/// Panics if a city index is out of bounds for `matrix`.
#[must_use]
pub fn tour_cost(path: &[usize], matrix: &DistanceMatrix, policy: NoLinkPolicy) -> f64 {
    let mut total = 0.0;
    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let d = matrix.get(from, to);
        if !policy.allows(from, to, d) {
            return f64::INFINITY;
        }
        total += d;
    }
    total
}

/// A matrix paired with the no-link policy fixed for one solve.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'m> {
    matrix: &'m DistanceMatrix,
    policy: NoLinkPolicy,
}

impl<'m> Evaluator<'m> {
    /// Bind a policy to a matrix.
    #[must_use]
    pub const fn new(matrix: &'m DistanceMatrix, policy: NoLinkPolicy) -> Self {
        Self { matrix, policy }
    }

    /// The underlying matrix.
    #[must_use]
    pub const fn matrix(&self) -> &'m DistanceMatrix {
        self.matrix
    }

    /// The active no-link policy.
    #[must_use]
    pub const fn policy(&self) -> NoLinkPolicy {
        self.policy
    }

    /// Number of cities.
    #[must_use]
    pub const fn city_count(&self) -> usize {
        self.matrix.len()
    }

    /// Length of edge `from -> to`, or `None` if it does not exist.
    #[inline]
    #[must_use]
    pub fn edge(&self, from: usize, to: usize) -> Option<f64> {
        let d = self.matrix.get(from, to);
        self.policy.allows(from, to, d).then_some(d)
    }

    /// Cost of `path` under this policy. See [`tour_cost`].
    #[inline]
    #[must_use]
    pub fn cost(&self, path: &[usize]) -> f64 {
        tour_cost(path, self.matrix, self.policy)
    }

    /// Cost of `path` after reversing `path[i..=k]`, without building it.
    ///
    /// `current` must be the finite cost of `path`. Requires
    /// `1 <= i < k <= path.len() - 2`, so both endpoints stay in place.
    ///
    /// For symmetric matrices only the two boundary edges change:
    ///
    /// ```text
    /// Δ = d(a, c) + d(b, e) − d(a, b) − d(c, e)
    ///     with a = π(i−1), b = π(i), c = π(k), e = π(k+1)
    /// ```
    ///
    /// Asymmetric matrices re-walk the whole path because every edge inside
    /// the segment changes direction.
    #[must_use]
    pub fn reversal_cost(&self, path: &[usize], current: f64, i: usize, k: usize) -> f64 {
        debug_assert!(i >= 1 && i < k && k + 1 < path.len());

        if self.matrix.is_symmetric() {
            let (a, b, c, e) = (path[i - 1], path[i], path[k], path[k + 1]);
            let (Some(ac), Some(be)) = (self.edge(a, c), self.edge(b, e)) else {
                return f64::INFINITY;
            };
            return current - self.matrix.get(a, b) - self.matrix.get(c, e) + ac + be;
        }

        let at = |pos: usize| {
            if pos < i || pos > k {
                path[pos]
            } else {
                path[i + k - pos]
            }
        };
        let mut total = 0.0;
        for pos in 0..path.len() - 1 {
            match self.edge(at(pos), at(pos + 1)) {
                Some(d) => total += d,
                None => return f64::INFINITY,
            }
        }
        total
    }
}
