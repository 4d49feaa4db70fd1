//! Error types for catalog generation and the route solver.

use crate::catalog::{ItemId, Position};
use thiserror::Error;

/// Errors raised while generating an item catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("cannot place {count} unique items on a grid with {capacity} cells")]
    CapacityExceeded { count: usize, capacity: usize },
    #[error("invalid catalog config: {0}")]
    InvalidConfig(String),
}

/// Errors raised by [`CoinSolver`](crate::solver::CoinSolver) and [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("solver is already initialized")]
    AlreadyInitialized,
    #[error("solver has not been initialized")]
    NotInitialized,
    #[error("route is exhausted; no targets remain")]
    Exhausted,
    #[error("duplicate item id {0}")]
    DuplicateId(ItemId),
    #[error("two items share position {0}")]
    DuplicatePosition(Position),
    #[error("item {0} has a zero score")]
    ZeroScore(ItemId),
    #[error("invalid solver config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
