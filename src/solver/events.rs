//! Score-acquired notifications.

use crate::catalog::ItemId;
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Emitted once for every collected target, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreEvent {
    /// Zero-based position in the event stream.
    pub sequence: usize,
    pub item: ItemId,
    pub score: u32,
}

/// Pending events plus channel subscribers.
///
/// Events are queued until drained and also fanned out to every live
/// subscriber. At most one event exists per item, so the queue is bounded
/// by the catalog size.
#[derive(Debug, Default)]
pub(crate) struct EventLog {
    pending: VecDeque<ScoreEvent>,
    subscribers: Vec<Sender<ScoreEvent>>,
    next_sequence: usize,
}

impl EventLog {
    pub fn push(&mut self, item: ItemId, score: u32) -> ScoreEvent {
        let event = ScoreEvent {
            sequence: self.next_sequence,
            item,
            score,
        };
        self.next_sequence += 1;

        self.subscribers.retain(|tx| tx.send(event).is_ok());
        self.pending.push_back(event);
        event
    }

    pub fn drain(&mut self) -> Vec<ScoreEvent> {
        self.pending.drain(..).collect()
    }

    pub fn subscribe(&mut self) -> Receiver<ScoreEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }
}
