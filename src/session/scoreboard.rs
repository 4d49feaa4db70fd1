//! Running score tally over a session.

use crate::catalog::ItemId;
use crate::solver::ScoreEvent;
use std::time::Duration;

/// Cumulative score after one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreSample {
    pub item: ItemId,
    /// Session total including this item.
    pub total: u64,
    /// Time since play started.
    pub elapsed: Duration,
}

/// Accumulates score events into a total and a score-over-time log.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    total: u64,
    samples: Vec<ScoreSample>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &ScoreEvent, elapsed: Duration) {
        self.total += u64::from(event.score);
        self.samples.push(ScoreSample {
            item: event.item,
            total: self.total,
            elapsed,
        });
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of collected items.
    pub fn collected(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[ScoreSample] {
        &self.samples
    }
}
