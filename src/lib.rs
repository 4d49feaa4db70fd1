//! Anytime route optimization for collecting scored items under a time budget.
//!
//! An agent starts on a bounded grid scattered with scored items and has a
//! fixed amount of time to collect as much score as it can. This crate
//! decides, continuously, the order in which to visit what remains:
//!
//! - **Catalog**: seeded, rejection-sampled placement of uniquely
//!   positioned items.
//! - **Route**: greedy score-per-distance construction and time-horizon
//!   route scoring.
//! - **Anneal**: anytime local search by random segment reversal with
//!   Metropolis acceptance and geometric cooling.
//! - **Solver**: the shared route, a target cursor for the foreground actor
//!   and a deadline-driven optimization loop for a background thread.
//! - **Session**: catalog + solver wiring, a background optimizer handle and
//!   a running scoreboard.
//!
//! # Architecture
//!
//! Two actors share one [`solver::CoinSolver`]: the foreground pops targets
//! and consumes score events, the background burns CPU time refining the
//! route. Route replacement is all-or-nothing, so a pop never observes a
//! half-written route. Rendering, movement and file export belong to the
//! embedding application.

pub mod anneal;
pub mod catalog;
pub mod error;
pub mod route;
pub mod session;
pub mod solver;

pub use error::{CatalogError, SolverError};
