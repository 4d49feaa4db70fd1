//! Route optimizer.
//!
//! Anytime local search over visiting orders: random segment reversal,
//! Metropolis acceptance on route score (higher is better) and geometric
//! cooling applied once per iteration.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Croes (1958), segment reversal as a tour neighborhood

mod config;
mod neighbor;
mod optimizer;

pub use config::AnnealConfig;
pub use neighbor::{reverse_segment, Reversal};
pub use optimizer::{acceptance_probability, IterationOutcome, RouteOptimizer};
