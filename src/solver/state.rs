//! Published route state and the target cursor.

use crate::catalog::{Item, Position};
use crate::route::{evaluate_route, RouteHorizon};

/// Route state shared between the cursor and the optimizer.
///
/// `score == evaluate_route(items, position, route, horizon)` holds after
/// every mutation. `revision` bumps on every mutation so a working copy
/// taken earlier can be recognised as stale.
#[derive(Debug, Clone)]
pub(crate) struct RouteState {
    pub position: Position,
    pub route: Vec<usize>,
    pub score: u64,
    pub revision: u64,
    pub current_target: Option<usize>,
    pub acquired_total: u64,
    pub pops: usize,
}

/// Result of one cursor advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pop {
    /// Previous target, now collected.
    pub acquired: Option<usize>,
    /// New target, or `None` when the route is exhausted.
    pub next: Option<usize>,
}

impl RouteState {
    pub fn new(items: &[Item], start: Position, route: Vec<usize>, horizon: &RouteHorizon) -> Self {
        let score = evaluate_route(items, start, &route, horizon);
        Self {
            position: start,
            route,
            score,
            revision: 0,
            current_target: None,
            acquired_total: 0,
            pops: 0,
        }
    }

    /// Collects the current target, then takes the route head as the next one.
    ///
    /// The departure position moves onto the new target and the score is
    /// re-evaluated for the shortened route. On an empty route the pending
    /// target is still collected, exactly once.
    pub fn pop_next(&mut self, items: &[Item], horizon: &RouteHorizon) -> Pop {
        let acquired = self.current_target.take();
        if let Some(index) = acquired {
            self.acquired_total += u64::from(items[index].score);
        }

        if self.route.is_empty() {
            return Pop {
                acquired,
                next: None,
            };
        }

        let next = self.route.remove(0);
        self.current_target = Some(next);
        self.position = items[next].position;
        self.score = evaluate_route(items, self.position, &self.route, horizon);
        self.revision += 1;
        self.pops += 1;

        Pop {
            acquired,
            next: Some(next),
        }
    }

    /// Replaces the route if nothing changed since `revision` was read.
    pub fn publish(&mut self, revision: u64, route: Vec<usize>, score: u64) -> bool {
        if self.revision != revision {
            return false;
        }
        self.route = route;
        self.score = score;
        self.revision += 1;
        true
    }
}
