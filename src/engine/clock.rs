//! Wall-clock deadlines for the anytime searches.
//!
//! Budgets are cooperative: loops poll [`Deadline::expired`] at their own
//! boundaries. Nothing is preempted, so a run may overshoot its budget by
//! one scan or one construction.

use std::time::{Duration, Instant};

/// A point in time after which a search should stop.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    /// When the budget started.
    started: Instant,
    /// `None` means unbounded.
    limit: Option<Duration>,
}

impl Deadline {
    /// Deadline `limit` from now.
    #[must_use]
    pub fn after(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit: Some(limit),
        }
    }

    /// Deadline `limit` from now, or unbounded.
    #[must_use]
    pub fn maybe_after(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// A deadline that never expires.
    #[must_use]
    pub fn never() -> Self {
        Self::maybe_after(None)
    }

    /// Whether the budget is spent.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.limit.is_some_and(|limit| self.started.elapsed() >= limit)
    }

    /// Time since the deadline was armed.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left, `None` when unbounded.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.limit
            .map(|limit| limit.saturating_sub(self.started.elapsed()))
    }
}
