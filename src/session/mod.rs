//! Session orchestration.
//!
//! Ties the pieces together the way an interactive front end drives them:
//! generate the catalog, initialize the solver, spend a preparation budget
//! optimizing, then hand out targets while a background thread keeps
//! refining the remaining route.

mod config;
mod runner;
mod scoreboard;

pub use config::SessionConfig;
pub use runner::{OptimizerHandle, Session};
pub use scoreboard::{ScoreSample, Scoreboard};
