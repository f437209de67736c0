//! Error types for tsp-grasp.
//!
//! All fallible operations return `Result<T, TspError>` instead of panicking.
//! A construction dead end is not an error: it is reported as a value by
//! [`crate::construct::Construction`]. Only malformed input, an exhausted
//! fallback ladder, and bad configuration surface here.

use thiserror::Error;

/// Result type alias for tsp-grasp operations.
pub type TspResult<T> = Result<T, TspError>;

/// Unified error type for all tsp-grasp operations.
#[derive(Debug, Error)]
pub enum TspError {
    // ===== Malformed Input =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A matrix field could not be parsed as a number.
    #[error("Parse error at line {line}, column {column}: '{token}' is not a number")]
    Parse {
        /// 1-based line number in the source file.
        line: usize,
        /// 1-based field index within the line.
        column: usize,
        /// Offending token.
        token: String,
    },

    /// A matrix row has the wrong number of fields.
    #[error("Matrix is not square: row {row} has {found} fields, expected {expected}")]
    NotSquare {
        /// 0-based row index.
        row: usize,
        /// Expected field count (number of rows).
        expected: usize,
        /// Field count found.
        found: usize,
    },

    /// A distance is negative, NaN or infinite.
    #[error("Invalid distance {value} at ({row}, {column}): distances must be finite and non-negative")]
    InvalidDistance {
        /// 0-based row index.
        row: usize,
        /// 0-based column index.
        column: usize,
        /// Offending value.
        value: f64,
    },

    /// Matrix has fewer than two cities.
    #[error("Matrix has {found} cities, at least 2 are required")]
    TooFewCities {
        /// Number of cities found.
        found: usize,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A city sequence violates the closed tour invariant.
    #[error("Invalid tour: {reason}")]
    InvalidTour {
        /// What is wrong with the sequence.
        reason: String,
    },

    // ===== Search Outcomes =====
    /// No Hamiltonian cycle honoring the no-link policy was found.
    #[error("Infeasible instance after {attempts} construction attempts: {reason}")]
    Infeasible {
        /// Number of construction attempts made.
        attempts: u64,
        /// Which strategies were exhausted.
        reason: String,
    },

    /// Instance exceeds what the exhaustive oracle will enumerate.
    #[error("Instance with {n} cities is too large for exact search (max {max})")]
    InstanceTooLarge {
        /// Number of cities.
        n: usize,
        /// Largest supported instance.
        max: usize,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TspError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an infeasibility error.
    #[must_use]
    pub fn infeasible(attempts: u64, reason: impl Into<String>) -> Self {
        Self::Infeasible {
            attempts,
            reason: reason.into(),
        }
    }

    /// Create an invalid tour error.
    #[must_use]
    pub fn invalid_tour(reason: impl Into<String>) -> Self {
        Self::InvalidTour {
            reason: reason.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Check if this error stems from malformed input (file, matrix or tour).
    #[must_use]
    pub const fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::Parse { .. }
                | Self::NotSquare { .. }
                | Self::InvalidDistance { .. }
                | Self::TooFewCities { .. }
                | Self::Yaml(_)
                | Self::InvalidTour { .. }
        )
    }

    /// Check if this error reports an infeasible instance.
    #[must_use]
    pub const fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible { .. })
    }
}
