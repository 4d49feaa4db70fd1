//! Seeded catalog generation by rejection sampling.

use super::config::CatalogConfig;
use super::types::{Item, Position};
use crate::error::CatalogError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::debug;

/// Generates `config.count` items at pairwise distinct grid cells.
///
/// Coordinates are drawn uniformly from `[0, width) x [0, height)`; a draw
/// that lands on an occupied cell is rejected and retried. Item `i` gets id
/// `i` and score `i + 1`. The result depends only on the config.
///
/// # Errors
///
/// [`CatalogError::CapacityExceeded`] when `count > width * height`.
///
/// # Examples
///
/// ```
/// use coin_route::catalog::{generate, CatalogConfig};
///
/// let items = generate(&CatalogConfig::default().with_grid(5, 5).with_count(10)).unwrap();
/// assert_eq!(items.len(), 10);
/// assert_eq!(items[9].score, 10);
/// ```
pub fn generate(config: &CatalogConfig) -> Result<Vec<Item>, CatalogError> {
    config.validate().map_err(CatalogError::InvalidConfig)?;

    let capacity = config.capacity();
    if config.count > capacity {
        return Err(CatalogError::CapacityExceeded {
            count: config.count,
            capacity,
        });
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut used: HashSet<Position> = HashSet::with_capacity(config.count);
    let mut items = Vec::with_capacity(config.count);
    let mut rejected = 0usize;

    for index in 0..config.count {
        loop {
            let position = Position::new(
                rng.random_range(0..config.width as i32),
                rng.random_range(0..config.height as i32),
            );
            if used.insert(position) {
                items.push(Item::new(index, position, index as u32 + 1));
                break;
            }
            rejected += 1;
        }
    }

    debug!(
        count = items.len(),
        rejected,
        seed = config.seed,
        "Generated item catalog"
    );
    Ok(items)
}
