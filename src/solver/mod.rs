//! Route solver.
//!
//! [`CoinSolver`] owns the session's route and exposes the two actors'
//! operations: the foreground target cursor
//! ([`advance_target`](CoinSolver::advance_target)) and the background,
//! deadline-driven optimizer
//! ([`run_optimization_iterations`](CoinSolver::run_optimization_iterations)).
//! Collected scores are reported as [`ScoreEvent`]s, one per collected
//! target, in collection order.

mod engine;
mod events;
mod report;
mod state;

pub use engine::CoinSolver;
pub use events::ScoreEvent;
pub use report::{OptimizeReport, SolverStatistics};
