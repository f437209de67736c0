//! No-link sentinel conventions.
//!
//! Course matrices mark a missing road either with a large sentinel
//! (commonly 1000) or with a literal 0 off the diagonal. The convention is
//! always explicit configuration and is logged when a solve starts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default sentinel threshold used by the course matrices.
pub const DEFAULT_NO_LINK_THRESHOLD: f64 = 1000.0;

/// Rule deciding which matrix entries are forbidden edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoLinkPolicy {
    /// `d(i,j) >= threshold` means no edge.
    Threshold(f64),
    /// `d(i,j) == 0` with `i != j` means no edge.
    ZeroMeansMissing,
}

impl Default for NoLinkPolicy {
    fn default() -> Self {
        Self::Threshold(DEFAULT_NO_LINK_THRESHOLD)
    }
}

impl NoLinkPolicy {
    /// Policy from a scalar threshold. Non-positive values select the
    /// zero-means-missing convention.
    #[must_use]
    pub fn from_threshold(threshold: f64) -> Self {
        if threshold > 0.0 {
            Self::Threshold(threshold)
        } else {
            Self::ZeroMeansMissing
        }
    }

    /// Every edge is allowed.
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self::Threshold(f64::INFINITY)
    }

    /// Whether the edge `from -> to` with distance `d` may be used.
    #[inline]
    #[must_use]
    pub fn allows(self, from: usize, to: usize, d: f64) -> bool {
        match self {
            Self::Threshold(t) => d < t,
            Self::ZeroMeansMissing => from == to || d != 0.0,
        }
    }
}

impl fmt::Display for NoLinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Threshold(t) if t.is_infinite() => write!(f, "all edges allowed"),
            Self::Threshold(t) => write!(f, "distance >= {t} means no link"),
            Self::ZeroMeansMissing => write!(f, "off-diagonal 0 means no link"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_rule() {
        let p = NoLinkPolicy::Threshold(1000.0);
        assert!(p.allows(0, 1, 999.9));
        assert!(!p.allows(0, 1, 1000.0));
        assert!(!p.allows(0, 1, 5000.0));
        // A zero distance is a valid edge under a threshold rule
        assert!(p.allows(0, 1, 0.0));
    }

    #[test]
    fn test_zero_rule() {
        let p = NoLinkPolicy::ZeroMeansMissing;
        assert!(!p.allows(0, 1, 0.0));
        assert!(p.allows(0, 1, 3.0));
        assert!(p.allows(2, 2, 0.0));
        assert!(p.allows(0, 1, 1e9));
    }

    #[test]
    fn test_from_threshold() {
        assert_eq!(NoLinkPolicy::from_threshold(1000.0), NoLinkPolicy::Threshold(1000.0));
        assert_eq!(NoLinkPolicy::from_threshold(0.0), NoLinkPolicy::ZeroMeansMissing);
        assert_eq!(NoLinkPolicy::from_threshold(-1.0), NoLinkPolicy::ZeroMeansMissing);
    }

    #[test]
    fn test_unrestricted() {
        let p = NoLinkPolicy::unrestricted();
        assert!(p.allows(0, 1, 1e300));
        assert!(p.allows(0, 1, 0.0));
        assert_eq!(p.to_string(), "all edges allowed");
    }

    #[test]
    fn test_default_is_course_sentinel() {
        assert_eq!(NoLinkPolicy::default(), NoLinkPolicy::Threshold(1000.0));
    }

    #[test]
    fn test_display() {
        assert!(NoLinkPolicy::Threshold(1000.0).to_string().contains(">= 1000"));
        assert!(NoLinkPolicy::ZeroMeansMissing.to_string().contains("0 means"));
    }
}
