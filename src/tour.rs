//! Closed tours and feasible solutions.
//!
//! # Invariants
//!
//! A [`Tour`] over `n` cities is a sequence of `n + 1` **0-based** city
//! indices whose first and last entries are equal, with every city appearing
//! exactly once among the first `n` positions. The start city sits at
//! position 0 and position `n`; 2-opt never moves either.
//!
//! A [`Solution`] is a tour paired with its finite cost. It can only be
//! obtained by evaluating a tour, so holding one proves feasibility.

use serde::Serialize;
use std::fmt;

use crate::error::{TspError, TspResult};
use crate::eval::Evaluator;

/// Closed visiting sequence of all cities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Tour {
    path: Vec<usize>,
}

impl Tour {
    /// Validate a closed path over `n` cities.
    ///
    /// # Errors
    ///
    /// Returns [`TspError::InvalidTour`] if the path is not closed, has the
    /// wrong length, names an unknown city, or repeats a city.
    pub fn new(path: Vec<usize>, n: usize) -> TspResult<Self> {
        if n < 2 || path.len() != n + 1 {
            return Err(TspError::invalid_tour(format!(
                "expected {} entries for {n} cities, got {}",
                n + 1,
                path.len()
            )));
        }
        if path.first() != path.last() {
            return Err(TspError::invalid_tour("first and last city differ"));
        }

        let mut seen = vec![false; n];
        for &city in &path[..n] {
            if city >= n {
                return Err(TspError::invalid_tour(format!(
                    "city {city} out of range for {n} cities"
                )));
            }
            if std::mem::replace(&mut seen[city], true) {
                return Err(TspError::invalid_tour(format!("city {city} visited twice")));
            }
        }

        Ok(Self { path })
    }

    /// Close an open visiting order by appending its first city.
    ///
    /// # Errors
    ///
    /// Same as [`Tour::new`].
    pub fn from_order(mut order: Vec<usize>) -> TspResult<Self> {
        let n = order.len();
        let Some(&start) = order.first() else {
            return Err(TspError::invalid_tour("empty visiting order"));
        };
        order.push(start);
        Self::new(order, n)
    }

    /// The naive tour `0, 1, …, n-1, 0`.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        assert!(n > 0, "identity tour needs at least one city");
        let path = (0..n).chain(std::iter::once(0)).collect();
        Self { path }
    }

    /// Built by the constructive heuristics, which maintain the invariant.
    pub(crate) fn from_closed_unchecked(path: Vec<usize>) -> Self {
        debug_assert!(path.len() >= 2 && path.first() == path.last());
        Self { path }
    }

    /// Full closed path, `n + 1` entries.
    #[must_use]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Number of distinct cities.
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.path.len() - 1
    }

    /// First (and last) city.
    #[must_use]
    pub fn start(&self) -> usize {
        self.path[0]
    }

    /// Visiting order without the closing city.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.path[..self.path.len() - 1]
    }

    /// Path with 1-based city labels, as printed for users.
    #[must_use]
    pub fn one_based(&self) -> Vec<usize> {
        self.path.iter().map(|c| c + 1).collect()
    }

    /// Reverse `path[i..=k]` in place.
    pub(crate) fn reverse_segment(&mut self, i: usize, k: usize) {
        self.path[i..=k].reverse();
    }

    /// Consume into the raw path.
    #[must_use]
    pub fn into_path(self) -> Vec<usize> {
        self.path
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, city) in self.path.iter().enumerate() {
            if pos > 0 {
                f.write_str(" → ")?;
            }
            write!(f, "{}", city + 1)?;
        }
        Ok(())
    }
}

/// A feasible tour and its finite cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    tour: Tour,
    cost: f64,
}

impl Solution {
    /// Evaluate `tour`; `None` if any edge is forbidden.
    #[must_use]
    pub fn evaluate(tour: Tour, eval: &Evaluator<'_>) -> Option<Self> {
        let cost = eval.cost(tour.path());
        cost.is_finite().then_some(Self { tour, cost })
    }

    /// Caller guarantees `cost` is the finite cost of `tour`.
    pub(crate) fn from_parts(tour: Tour, cost: f64) -> Self {
        debug_assert!(cost.is_finite());
        Self { tour, cost }
    }

    /// The tour.
    #[must_use]
    pub const fn tour(&self) -> &Tour {
        &self.tour
    }

    /// Total length.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Whether this solution is strictly cheaper than `other` beyond `eps`.
    #[must_use]
    pub fn improves_on(&self, other: &Self, eps: f64) -> bool {
        self.cost < other.cost - eps
    }

    /// Split into tour and cost.
    #[must_use]
    pub fn into_parts(self) -> (Tour, f64) {
        (self.tour, self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{DistanceMatrix, NoLinkPolicy};

    #[test]
    fn test_new_valid() {
        let t = Tour::new(vec![2, 0, 1, 2], 3).expect("valid");
        assert_eq!(t.start(), 2);
        assert_eq!(t.city_count(), 3);
        assert_eq!(t.order(), &[2, 0, 1]);
    }

    #[test]
    fn test_new_rejects_open_path() {
        assert!(Tour::new(vec![0, 1, 2, 1], 3).is_err());
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(Tour::new(vec![0, 1, 0], 3).is_err());
    }

    #[test]
    fn test_new_rejects_duplicates_and_range() {
        assert!(Tour::new(vec![0, 1, 1, 0], 3).is_err());
        assert!(Tour::new(vec![0, 1, 5, 0], 3).is_err());
    }

    #[test]
    fn test_from_order() {
        let t = Tour::from_order(vec![1, 3, 0, 2]).expect("valid");
        assert_eq!(t.path(), &[1, 3, 0, 2, 1]);
        assert!(Tour::from_order(Vec::new()).is_err());
    }

    #[test]
    fn test_identity() {
        assert_eq!(Tour::identity(4).path(), &[0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_display_is_one_based() {
        let t = Tour::identity(3);
        assert_eq!(t.to_string(), "1 → 2 → 3 → 1");
        assert_eq!(t.one_based(), vec![1, 2, 3, 1]);
    }

    #[test]
    fn test_reverse_segment() {
        let mut t = Tour::identity(5);
        t.reverse_segment(1, 3);
        assert_eq!(t.path(), &[0, 3, 2, 1, 4, 0]);
    }

    #[test]
    fn test_solution_evaluate() {
        let m = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 1000.0],
            vec![1.0, 0.0, 2.0],
            vec![1000.0, 2.0, 0.0],
        ])
        .expect("valid");
        let eval = Evaluator::new(&m, NoLinkPolicy::Threshold(1000.0));
        assert!(Solution::evaluate(Tour::identity(3), &eval).is_none());

        let eval = Evaluator::new(&m, NoLinkPolicy::unrestricted());
        let s = Solution::evaluate(Tour::identity(3), &eval).expect("feasible");
        assert!((s.cost() - 1003.0).abs() < 1e-12);
    }

    #[test]
    fn test_improves_on() {
        let a = Solution::from_parts(Tour::identity(3), 10.0);
        let b = Solution::from_parts(Tour::identity(3), 9.0);
        assert!(b.improves_on(&a, 1e-9));
        assert!(!a.improves_on(&b, 1e-9));
        assert!(!a.improves_on(&a, 1e-9));
    }

    #[test]
    fn test_serializes_as_plain_path() {
        let s = Solution::from_parts(Tour::identity(2), 4.0);
        let json = serde_json::to_string(&s).expect("serialize");
        assert_eq!(json, r#"{"tour":[0,1,0],"cost":4.0}"#);
    }
}
