//! Distance matrices and the rules that decide which edges exist.
//!
//! A [`DistanceMatrix`] is a validated, immutable `n×n` table of finite,
//! non-negative distances. Which entries count as "no edge" is not a
//! property of the matrix: it is decided by a [`NoLinkPolicy`] chosen
//! explicitly by the caller.

pub mod instance;
pub mod loader;
pub mod policy;

pub use instance::{MatrixInstance, NoLinkSpec};
pub use loader::{load_any, load_matrix, parse_delimited, LoadedMatrix, DEFAULT_DELIMITER};
pub use policy::{NoLinkPolicy, DEFAULT_NO_LINK_THRESHOLD};

use crate::error::{TspError, TspResult};

/// Square matrix of pairwise distances, stored row-major.
///
/// Symmetry is not required. It is detected once at construction so that
/// local search can use constant-time move deltas when it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
    symmetric: bool,
}

impl DistanceMatrix {
    /// Build a matrix from rows, validating shape and values.
    ///
    /// # Errors
    ///
    /// - [`TspError::TooFewCities`] if there are fewer than two rows
    /// - [`TspError::NotSquare`] if any row length differs from the row count
    /// - [`TspError::InvalidDistance`] for negative, NaN or infinite entries
    pub fn from_rows(rows: Vec<Vec<f64>>) -> TspResult<Self> {
        let n = rows.len();
        if n < 2 {
            return Err(TspError::TooFewCities { found: n });
        }

        let mut data = Vec::with_capacity(n * n);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n {
                return Err(TspError::NotSquare {
                    row,
                    expected: n,
                    found: values.len(),
                });
            }
            for (column, &value) in values.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(TspError::InvalidDistance { row, column, value });
                }
            }
            data.extend(values);
        }

        let symmetric = (0..n).all(|i| ((i + 1)..n).all(|j| data[i * n + j] == data[j * n + i]));

        Ok(Self { n, data, symmetric })
    }

    /// Number of cities.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.n
    }

    /// Always false: a validated matrix has at least two cities.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.n + to]
    }

    /// Whether `d(i,j) == d(j,i)` for every pair.
    #[must_use]
    pub const fn is_symmetric(&self) -> bool {
        self.symmetric
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(rows: &[&[f64]]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn test_from_rows_valid() {
        let m = DistanceMatrix::from_rows(square(&[&[0.0, 2.0, 3.0], &[2.0, 0.0, 4.0], &[3.0, 4.0, 0.0]]))
            .expect("valid matrix");
        assert_eq!(m.len(), 3);
        assert!(!m.is_empty());
        assert!((m.get(1, 2) - 4.0).abs() < f64::EPSILON);
        assert!(m.is_symmetric());
        assert!((m.get(2, 0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_asymmetric_detected() {
        let m = DistanceMatrix::from_rows(square(&[&[0.0, 1.0], &[5.0, 0.0]])).expect("valid");
        assert!(!m.is_symmetric());
        assert!((m.get(0, 1) - 1.0).abs() < f64::EPSILON);
        assert!((m.get(1, 0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_not_square() {
        let err = DistanceMatrix::from_rows(square(&[&[0.0, 1.0, 2.0], &[1.0, 0.0], &[2.0, 1.0, 0.0]]))
            .expect_err("ragged");
        assert!(matches!(
            err,
            TspError::NotSquare {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_negative_rejected() {
        let err = DistanceMatrix::from_rows(square(&[&[0.0, -1.0], &[1.0, 0.0]])).expect_err("negative");
        assert!(matches!(err, TspError::InvalidDistance { row: 0, column: 1, .. }));
    }

    #[test]
    fn test_nan_rejected() {
        let err = DistanceMatrix::from_rows(square(&[&[0.0, 1.0], &[f64::NAN, 0.0]])).expect_err("nan");
        assert!(matches!(err, TspError::InvalidDistance { row: 1, column: 0, .. }));
    }

    #[test]
    fn test_too_few_cities() {
        let err = DistanceMatrix::from_rows(vec![vec![0.0]]).expect_err("single city");
        assert!(matches!(err, TspError::TooFewCities { found: 1 }));
        let err = DistanceMatrix::from_rows(Vec::new()).expect_err("empty");
        assert!(matches!(err, TspError::TooFewCities { found: 0 }));
    }
}
