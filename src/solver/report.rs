//! Optimization run summaries.

use std::time::Duration;

/// Result of one call into the optimization loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizeReport {
    /// Iterations executed in this run.
    pub iterations: usize,

    /// Candidates published as the new route.
    pub accepted_moves: usize,

    /// Published candidates that scored strictly higher.
    pub improving_moves: usize,

    /// Accepted candidates discarded because a pop changed the route first.
    pub stale_discards: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Route score when the run stopped.
    pub final_score: u64,

    /// Highest route score published during the run.
    pub best_score: u64,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped because its deadline passed.
    pub deadline_reached: bool,

    pub elapsed: Duration,
}

/// Point-in-time view of the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverStatistics {
    /// Iterations run across all optimization calls.
    pub iterations: usize,
    /// Published candidates across all optimization calls. Stale discards
    /// are not counted.
    pub accepted_moves: usize,
    pub improving_moves: usize,
    pub temperature: f64,
    /// Score of the remaining route from the current departure position.
    pub current_score: u64,
    pub remaining: usize,
    /// Leading remaining items that fit inside the time horizon.
    pub reachable: usize,
    /// Targets handed out so far.
    pub pops: usize,
    /// Sum of collected target scores.
    pub acquired_total: u64,
}
