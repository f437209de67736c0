//! CLI output formatting.
//!
//! Rendering returns strings so it can be tested without capturing stdout.
//! Tours are printed with 1-based city labels.

use serde::Serialize;
use std::fmt::Write as _;

use crate::construct::TieBreak;
use crate::error::{TspError, TspResult};
use crate::exact::ExactMethod;
use crate::local_search::{AcceptancePolicy, LocalSearchOutcome};
use crate::search::GraspReport;
use crate::tour::Solution;

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum CommandReport {
    /// `grasp`
    Grasp(GraspReport),
    /// `greedy`
    Greedy(GreedyReport),
    /// `two-opt`
    TwoOpt(TwoOptReport),
    /// `exact`
    Exact(ExactReport),
}

/// Result of the `greedy` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GreedyReport {
    /// Cheapest tour found.
    pub solution: Solution,
    /// Tie-breaking rule used.
    pub ties: TieBreak,
    /// Starts tried.
    pub starts_tried: usize,
    /// Starts that produced a closed tour.
    pub feasible_starts: usize,
}

/// Result of the `two-opt` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoOptReport {
    /// Tour the search started from.
    pub initial: Solution,
    /// Whether `initial` is the naive tour or a fallback tour.
    pub naive_start: bool,
    /// Acceptance policy used.
    pub policy: AcceptancePolicy,
    /// Moves, trace and final tour.
    pub outcome: LocalSearchOutcome,
}

/// Result of the `exact` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExactReport {
    /// Method used.
    pub method: ExactMethod,
    /// Optimal tour.
    pub solution: Solution,
}

/// Pretty-printed JSON.
///
/// # Errors
///
/// Returns [`TspError::Serialization`] if serialization fails.
pub fn render_json(report: &CommandReport) -> TspResult<String> {
    serde_json::to_string_pretty(report).map_err(|e| TspError::serialization(e.to_string()))
}

/// Human-readable report.
#[must_use]
pub fn render_text(report: &CommandReport) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = match report {
        CommandReport::Grasp(r) => write_grasp(&mut out, r),
        CommandReport::Greedy(r) => write_greedy(&mut out, r),
        CommandReport::TwoOpt(r) => write_two_opt(&mut out, r),
        CommandReport::Exact(r) => write_exact(&mut out, r),
    };
    out
}

fn write_solution(out: &mut String, label: &str, solution: &Solution) -> std::fmt::Result {
    writeln!(out, "{label}: {}", solution.tour())?;
    writeln!(out, "Cost: {}", solution.cost())
}

fn write_grasp(out: &mut String, r: &GraspReport) -> std::fmt::Result {
    writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    writeln!(
        out,
        "GRASP: seed {}, {} iteration(s), {} worker(s), {:.3} s",
        r.seed,
        r.iterations,
        r.workers,
        r.elapsed.as_secs_f64()
    )?;
    writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    if r.construction_failures > 0 {
        writeln!(out, "Construction dead ends: {}", r.construction_failures)?;
    }
    if let Some(stage) = r.fallback {
        writeln!(out, "Fallback used: {stage}")?;
    }
    writeln!(out, "Improvements:")?;
    for (idx, step) in r.history.iter().enumerate() {
        writeln!(
            out,
            "  #{:<3} iter {:<6} {:>8.3} s  cost {}",
            idx + 1,
            step.iteration,
            step.elapsed.as_secs_f64(),
            step.cost
        )?;
    }
    writeln!(out)?;
    write_solution(out, "Best tour", &r.best)
}

fn write_greedy(out: &mut String, r: &GreedyReport) -> std::fmt::Result {
    let ties = match r.ties {
        TieBreak::First => "lowest index",
        TieBreak::Random => "random",
    };
    writeln!(
        out,
        "Nearest neighbor ({ties} ties): {} of {} start(s) feasible",
        r.feasible_starts, r.starts_tried
    )?;
    write_solution(out, "Tour", &r.solution)
}

fn write_two_opt(out: &mut String, r: &TwoOptReport) -> std::fmt::Result {
    let label = if r.naive_start { "Naive tour" } else { "Start tour" };
    write_solution(out, label, &r.initial)?;
    writeln!(out)?;

    let mut path = r.initial.tour().path().to_vec();
    for (idx, step) in r.outcome.trace.iter().enumerate() {
        path[step.i..=step.k].reverse();
        let labels: Vec<String> = path.iter().map(|c| (c + 1).to_string()).collect();
        writeln!(
            out,
            "Step {}: reverse positions {}..{} -> {} (cost {})",
            idx + 1,
            step.i + 1,
            step.k + 1,
            labels.join(" → "),
            step.cost
        )?;
    }

    writeln!(out)?;
    let status = if r.outcome.reached_local_optimum {
        "local optimum reached"
    } else {
        "stopped before a local optimum"
    };
    writeln!(out, "{} move(s), {} scan(s), {status}", r.outcome.moves, r.outcome.scans)?;
    write_solution(out, "Final tour", &r.outcome.solution)
}

fn write_exact(out: &mut String, r: &ExactReport) -> std::fmt::Result {
    let method = match r.method {
        ExactMethod::Enumerate => "full enumeration",
        ExactMethod::BranchAndBound => "branch and bound",
    };
    writeln!(out, "Exact search ({method})")?;
    write_solution(out, "Optimal tour", &r.solution)
}
