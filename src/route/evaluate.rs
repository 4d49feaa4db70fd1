//! Time-horizon route scoring.

use crate::catalog::{Item, Position};

/// Time budget and travel speed used to score routes.
///
/// Travelling from `a` to `b` takes `a.distance(b) / speed_factor` time
/// units; items reached at or after `time_limit` earn nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteHorizon {
    /// Session duration. `f64::INFINITY` means unlimited.
    pub time_limit: f64,

    /// Travel speed multiplier. Must be positive and finite.
    pub speed_factor: f64,
}

impl Default for RouteHorizon {
    fn default() -> Self {
        Self {
            time_limit: 10.0,
            speed_factor: 6.0,
        }
    }
}

impl RouteHorizon {
    pub fn new(time_limit: f64, speed_factor: f64) -> Self {
        Self {
            time_limit,
            speed_factor,
        }
    }

    /// A horizon under which every item of any route counts.
    pub fn unlimited() -> Self {
        Self::new(f64::INFINITY, 1.0)
    }

    /// Time needed to travel between two positions.
    #[inline]
    pub fn travel_time(&self, from: &Position, to: &Position) -> f64 {
        from.distance(to) / self.speed_factor
    }

    /// Validates the horizon.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit.is_nan() || self.time_limit < 0.0 {
            return Err(format!(
                "time_limit must be non-negative, got {}",
                self.time_limit
            ));
        }
        if !(self.speed_factor.is_finite() && self.speed_factor > 0.0) {
            return Err(format!(
                "speed_factor must be positive and finite, got {}",
                self.speed_factor
            ));
        }
        Ok(())
    }
}

/// Sums the scores of the route's items reachable within the horizon.
///
/// Walks `route` (indices into `items`) from `start`, accumulating travel
/// time. Scoring stops at the first item whose arrival time is
/// `>= horizon.time_limit`; that item and everything after it contribute
/// nothing.
///
/// # Panics
///
/// Panics if a route index is out of bounds for `items`.
pub fn evaluate_route(
    items: &[Item],
    start: Position,
    route: &[usize],
    horizon: &RouteHorizon,
) -> u64 {
    let mut score = 0u64;
    let mut elapsed = 0.0f64;
    let mut position = start;

    for &index in route {
        let item = &items[index];
        elapsed += horizon.travel_time(&position, &item.position);
        if elapsed >= horizon.time_limit {
            break;
        }
        score += u64::from(item.score);
        position = item.position;
    }

    score
}

/// Number of leading route items reachable within the horizon.
pub fn reachable_prefix(
    items: &[Item],
    start: Position,
    route: &[usize],
    horizon: &RouteHorizon,
) -> usize {
    let mut elapsed = 0.0f64;
    let mut position = start;

    for (visited, &index) in route.iter().enumerate() {
        let item = &items[index];
        elapsed += horizon.travel_time(&position, &item.position);
        if elapsed >= horizon.time_limit {
            return visited;
        }
        position = item.position;
    }

    route.len()
}
