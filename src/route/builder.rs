//! Greedy score-per-distance route construction.
//!
//! # Algorithm
//!
//! 1. From the current position, rate every remaining item by
//!    `score / distance(current, item)`
//! 2. Take the highest rated item (strict `>`, so the first maximum in
//!    remaining order wins ties)
//! 3. Move the current position onto it and repeat until nothing remains
//!
//! # Complexity
//!
//! O(n²): every step rescans the remaining set. Fine for tens to a few
//! hundred items.

use crate::catalog::{Item, Position};

/// Score-per-distance value of travelling from `from` to `item`.
///
/// An item sitting exactly on `from` rates `f64::INFINITY`, so it is taken
/// before anything else rather than producing a NaN.
#[inline]
pub fn value_per_distance(from: &Position, item: &Item) -> f64 {
    let distance = from.distance(&item.position);
    if distance == 0.0 {
        f64::INFINITY
    } else {
        f64::from(item.score) / distance
    }
}

/// Builds a greedy visiting order over `items`, starting at `start`.
///
/// Returns a permutation of `0..items.len()` as indices into `items`.
///
/// # Examples
///
/// ```
/// use coin_route::catalog::{Item, Position};
/// use coin_route::route::build_greedy;
///
/// let items = vec![
///     Item::new(0, (5, 0), 1),
///     Item::new(1, (1, 0), 4),
/// ];
/// assert_eq!(build_greedy(Position::new(0, 0), &items), vec![1, 0]);
/// ```
pub fn build_greedy(start: Position, items: &[Item]) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..items.len()).collect();
    let mut route = Vec::with_capacity(items.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut best: Option<(usize, f64)> = None;
        for (slot, &index) in remaining.iter().enumerate() {
            let value = value_per_distance(&current, &items[index]);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((slot, value));
            }
        }

        let Some((slot, _)) = best else {
            break;
        };
        // `remove` keeps the remaining order stable for tie-breaking.
        let index = remaining.remove(slot);
        current = items[index].position;
        route.push(index);
    }

    route
}
