//! Solver configuration with YAML loading and validation.
//!
//! Every field has a default, so an empty document is a valid config.
//! Command-line flags override file values after loading.
//!
//! # Example YAML
//!
//! ```yaml
//! schema_version: "1.0"
//! input:
//!   delimiter: ";"
//!   no_link:
//!     threshold: 1000
//! grasp:
//!   rcl_size: 3
//!   time_budget_secs: 60
//!   local_search_secs: 3
//!   seed: 42
//!   workers: 4
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::construct::StartCity;
use crate::error::{TspError, TspResult};
use crate::local_search::AcceptancePolicy;
use crate::matrix::{NoLinkPolicy, NoLinkSpec, DEFAULT_DELIMITER, DEFAULT_NO_LINK_THRESHOLD};
use crate::search::{FallbackLadder, GraspConfig};

/// Top-level solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    /// Schema version for forward compatibility.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// How matrix files are read.
    #[serde(default)]
    pub input: InputConfig,

    /// GRASP parameters.
    #[serde(default)]
    pub grasp: GraspSettings,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            input: InputConfig::default(),
            grasp: GraspSettings::default(),
        }
    }
}

impl SolverConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> TspResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> TspResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> TspResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check semantic constraints beyond the schema.
    ///
    /// # Errors
    ///
    /// Returns [`TspError::Config`] describing the first violation.
    pub fn validate(&self) -> TspResult<()> {
        if self.schema_version.is_empty() {
            return Err(TspError::config("schema_version must not be empty"));
        }
        self.input.validate()?;
        self.grasp_config()?.validate()
    }

    /// Active no-link policy.
    ///
    /// # Errors
    ///
    /// Returns [`TspError::Config`] if the `no_link` block is ambiguous.
    pub fn no_link_policy(&self) -> TspResult<NoLinkPolicy> {
        self.input.no_link.policy()
    }

    /// GRASP driver configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TspError::Config`] if a time budget is not a finite,
    /// non-negative number of seconds, or if `start_city` is 0.
    pub fn grasp_config(&self) -> TspResult<GraspConfig> {
        let g = &self.grasp;
        Ok(GraspConfig {
            rcl_size: g.rcl_size,
            time_budget: seconds("time_budget_secs", g.time_budget_secs)?,
            local_search_time_budget: seconds("local_search_secs", g.local_search_secs)?,
            max_iterations: g.max_iterations,
            seed: g.seed,
            start: match g.start_city {
                None => StartCity::Random,
                Some(0) => return Err(TspError::config("start_city is 1-based, got 0")),
                Some(label) => StartCity::Fixed(label - 1),
            },
            policy: g.policy,
            workers: g.workers,
            max_construction_failures: g.max_construction_failures,
            fallback_restarts: g.fallback_restarts,
        })
    }
}

fn seconds(field: &str, value: f64) -> TspResult<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| TspError::config(format!("{field} must be a non-negative number, got {value}")))
}

/// Matrix file settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Field separator.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// No-link convention.
    #[serde(default = "default_no_link")]
    pub no_link: NoLinkSpec,
}

const fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

const fn default_no_link() -> NoLinkSpec {
    NoLinkSpec {
        threshold: Some(DEFAULT_NO_LINK_THRESHOLD),
        zero: false,
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            no_link: default_no_link(),
        }
    }
}

impl InputConfig {
    fn validate(&self) -> TspResult<()> {
        let d = self.delimiter;
        if d.is_ascii_digit() || matches!(d, '.' | '-' | '+' | '\n' | '\r') {
            return Err(TspError::config(format!(
                "delimiter {d:?} would be confused with numbers or line breaks"
            )));
        }
        if let Some(t) = self.no_link.threshold {
            if t.is_nan() {
                return Err(TspError::config("no_link.threshold must be a number"));
            }
        }
        self.no_link.policy().map(|_| ())
    }
}

/// GRASP section as written in YAML. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraspSettings {
    /// RCL size `k`.
    #[serde(default = "default_rcl_size")]
    pub rcl_size: usize,

    /// Global time budget.
    #[serde(default = "default_time_budget")]
    pub time_budget_secs: f64,

    /// Per-iteration 2-opt budget.
    #[serde(default = "default_local_search_budget")]
    pub local_search_secs: f64,

    /// Iteration cap per worker.
    #[serde(default)]
    pub max_iterations: Option<u64>,

    /// Master seed; clock-derived when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Fixed 1-based start city, as printed in tours; random when absent.
    #[serde(default)]
    pub start_city: Option<usize>,

    /// 2-opt acceptance policy.
    #[serde(default)]
    pub policy: AcceptancePolicy,

    /// Parallel workers.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Consecutive dead ends before the fallback ladder.
    #[serde(default = "default_max_failures")]
    pub max_construction_failures: u64,

    /// Random restarts in the fallback ladder.
    #[serde(default = "default_fallback_restarts")]
    pub fallback_restarts: u64,
}

const fn default_rcl_size() -> usize {
    3
}

const fn default_time_budget() -> f64 {
    60.0
}

const fn default_local_search_budget() -> f64 {
    3.0
}

const fn default_workers() -> usize {
    1
}

const fn default_max_failures() -> u64 {
    25
}

const fn default_fallback_restarts() -> u64 {
    FallbackLadder::DEFAULT_RESTARTS
}

impl Default for GraspSettings {
    fn default() -> Self {
        Self {
            rcl_size: default_rcl_size(),
            time_budget_secs: default_time_budget(),
            local_search_secs: default_local_search_budget(),
            max_iterations: None,
            seed: None,
            start_city: None,
            policy: AcceptancePolicy::default(),
            workers: default_workers(),
            max_construction_failures: default_max_failures(),
            fallback_restarts: default_fallback_restarts(),
        }
    }
}
