//! YAML instance files.
//!
//! A YAML instance carries the matrix together with its no-link
//! convention, so an experiment can be shared as one file.
//!
//! # Example YAML
//!
//! ```yaml
//! name: "matriz-a"
//! description: "7-city 2-opt example"
//! units: "km"
//! optimal_known: 61
//! no_link:
//!   threshold: 1000
//! matrix:
//!   - [0, 12, 1000]
//!   - [12, 0, 9]
//!   - [1000, 9, 0]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{DistanceMatrix, NoLinkPolicy};
use crate::error::{TspError, TspResult};

/// No-link convention as written in an instance file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NoLinkSpec {
    /// Sentinel threshold; `d >= threshold` means no edge.
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Off-diagonal zeros mean no edge.
    #[serde(default)]
    pub zero: bool,
}

impl NoLinkSpec {
    /// Resolve to a policy.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when both or neither rule is given.
    pub fn policy(&self) -> TspResult<NoLinkPolicy> {
        match (self.threshold, self.zero) {
            (Some(_), true) => Err(TspError::config(
                "no_link: give either `threshold` or `zero: true`, not both",
            )),
            (Some(t), false) => Ok(NoLinkPolicy::from_threshold(t)),
            (None, true) => Ok(NoLinkPolicy::ZeroMeansMissing),
            (None, false) => Err(TspError::config(
                "no_link: expected `threshold` or `zero: true`",
            )),
        }
    }
}

/// A complete TSP instance read from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixInstance {
    /// Instance name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Distance units (e.g., "km").
    #[serde(default = "default_units")]
    pub units: String,
    /// Known optimal tour cost, for verification.
    #[serde(default)]
    pub optimal_known: Option<f64>,
    /// No-link convention; falls back to the caller's policy when absent.
    #[serde(default)]
    pub no_link: Option<NoLinkSpec>,
    /// Distance matrix rows.
    pub matrix: Vec<Vec<f64>>,
}

fn default_units() -> String {
    "units".to_string()
}

impl MatrixInstance {
    /// Parse an instance from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`TspError::Yaml`] if the document is invalid.
    pub fn from_yaml(yaml: &str) -> TspResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load an instance from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or YAML is invalid.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> TspResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Number of matrix rows.
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.matrix.len()
    }

    /// Validated distance matrix.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`DistanceMatrix::from_rows`].
    pub fn distance_matrix(&self) -> TspResult<DistanceMatrix> {
        DistanceMatrix::from_rows(self.matrix.clone())
    }

    /// The instance's own no-link policy, if it declares one.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a contradictory `no_link` block.
    pub fn policy(&self) -> TspResult<Option<NoLinkPolicy>> {
        self.no_link.as_ref().map(NoLinkSpec::policy).transpose()
    }
}
