//! Route construction and scoring.
//!
//! A route is an ordered list of indices into the session's item slice.
//! Routes never contain duplicates; every operation that reorders a route
//! produces a permutation of its input.

mod builder;
mod evaluate;

pub use builder::{build_greedy, value_per_distance};
pub use evaluate::{evaluate_route, reachable_prefix, RouteHorizon};
