//! Item catalog.
//!
//! A catalog is the immutable set of scored items scattered on a bounded
//! grid. It is generated once per session from a seeded stream that is
//! independent of the optimizer's stream, so placement is reproducible on
//! its own.

mod config;
mod generator;
mod types;

pub use config::CatalogConfig;
pub use generator::generate;
pub use types::{Item, ItemId, Position};
