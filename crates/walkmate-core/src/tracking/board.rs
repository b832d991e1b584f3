//! Latest-position board.
//!
//! Consumers key incoming samples by publisher identity and keep only the
//! newest one: one entry per active publisher, overwritten on each arrival,
//! so the board never grows beyond the live participant count.

use super::sample::PositionSample;
use std::collections::HashMap;

/// Per-publisher latest-sample arena.
#[derive(Debug, Default)]
pub struct PositionBoard {
    latest: HashMap<String, PositionSample>,
}

impl PositionBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a sample into the board.
    ///
    /// Returns `false` when the sample is stale, i.e. an already-held sample
    /// from the same publisher carries a newer timestamp; stale samples are
    /// discarded.
    pub fn observe(&mut self, sample: PositionSample) -> bool {
        match self.latest.get(&sample.publisher_id) {
            Some(held) if held.recorded_at > sample.recorded_at => {
                tracing::trace!(
                    target: "presence",
                    "discarding stale sample from '{}'",
                    sample.publisher_id
                );
                false
            }
            _ => {
                self.latest.insert(sample.publisher_id.clone(), sample);
                true
            }
        }
    }

    /// Latest sample held for a publisher.
    pub fn latest_for(&self, publisher_id: &str) -> Option<&PositionSample> {
        self.latest.get(publisher_id)
    }

    /// All held samples, one per publisher, in publisher-id order.
    pub fn snapshot(&self) -> Vec<PositionSample> {
        let mut samples: Vec<PositionSample> = self.latest.values().cloned().collect();
        samples.sort_by(|a, b| a.publisher_id.cmp(&b.publisher_id));
        samples
    }

    /// Number of publishers currently on the board.
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    /// Returns true when no publisher has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}
