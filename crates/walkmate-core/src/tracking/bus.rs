//! Presence/location bus.
//!
//! A topic-scoped, at-most-once, unordered-across-publishers broadcast
//! primitive. One `tokio::sync::broadcast` sender exists per topic; samples
//! are fanned out to every current subscriber of that topic. The bus retains
//! no history: a subscriber joining late misses all prior samples, and a
//! publish with no live subscribers is dropped.

use super::sample::PositionSample;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// In-process publish/subscribe bus for position samples.
///
/// Publish is fire-and-forget and subscribe yields asynchronously; neither
/// blocks the caller. Topics whose last subscriber disconnected are pruned,
/// so the bus does not accumulate dead subscriptions.
#[derive(Debug)]
pub struct PresenceBus {
    /// Live broadcast channels keyed by topic.
    topics: RwLock<HashMap<String, broadcast::Sender<PositionSample>>>,
    /// Per-topic channel capacity; a subscriber falling further behind than
    /// this skips ahead.
    capacity: usize,
}

impl PresenceBus {
    /// Creates a bus with the given per-topic channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Publishes a sample to a topic. Fire-and-forget: no acknowledgment,
    /// no retry. If nobody is subscribed the sample is dropped.
    pub async fn publish(&self, topic: &str, sample: PositionSample) {
        let sender = {
            let topics = self.topics.read().await;
            topics.get(topic).cloned()
        };
        let Some(sender) = sender else {
            tracing::trace!(target: "presence", "dropping sample for idle topic '{}'", topic);
            return;
        };
        if sender.send(sample).is_err() {
            // Last receiver is gone; release the channel.
            let mut topics = self.topics.write().await;
            if topics
                .get(topic)
                .is_some_and(|s| s.receiver_count() == 0)
            {
                topics.remove(topic);
                tracing::debug!(target: "presence", "pruned idle topic '{}'", topic);
            }
        }
    }

    /// Subscribes to a topic.
    ///
    /// The returned `Subscription` yields samples from all current
    /// publishers on the topic except the subscriber's own, starting from
    /// the moment of subscription (no replay). Dropping the subscription
    /// releases it.
    pub async fn subscribe(&self, topic: &str, subscriber_id: impl Into<String>) -> Subscription {
        let mut topics = self.topics.write().await;
        let sender = topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        Subscription {
            topic: topic.to_string(),
            subscriber_id: subscriber_id.into(),
            rx: sender.subscribe(),
        }
    }

    /// Number of topics with a live channel. For diagnostics and tests.
    pub async fn topic_count(&self) -> usize {
        self.topics.read().await.len()
    }
}

/// A live subscription to one topic.
///
/// The sequence is lazy and infinite from the caller's perspective: `next`
/// resolves when a foreign sample arrives and returns `None` only when the
/// underlying channel is torn down. Reconnecting means subscribing again;
/// there is no replay.
pub struct Subscription {
    topic: String,
    subscriber_id: String,
    rx: broadcast::Receiver<PositionSample>,
}

impl Subscription {
    /// Waits for the next sample from another publisher.
    ///
    /// The subscriber's own samples are filtered out. A lagged receiver
    /// skips the missed samples and keeps going; delivery is at-most-once.
    pub async fn next(&mut self) -> Option<PositionSample> {
        loop {
            match self.rx.recv().await {
                Ok(sample) if sample.publisher_id == self.subscriber_id => continue,
                Ok(sample) => return Some(sample),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        target: "presence",
                        "subscriber '{}' lagged on topic '{}', skipped {} sample(s)",
                        self.subscriber_id, self.topic, skipped
                    );
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// The topic this subscription listens on.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}
