//! Live tracking use case.
//!
//! Bridges an authorized participant onto the presence/location bus for the
//! duration of a walk: opening a feed authorizes against current session
//! state, subscribes to the session topic, and pumps incoming samples into a
//! latest-position board until the feed is closed. Publishing goes through a
//! debounced handle so a chatty positioning sensor cannot flood the bus.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use walkmate_core::config::TrackingSettings;
use walkmate_core::error::Result;
use walkmate_core::session::SessionRepository;
use walkmate_core::tracking::{
    ChannelGrant, ParticipantRole, PositionBoard, PositionSample, PresenceBus,
    TrackingController,
};

/// Use case for live position exchange during a walk.
pub struct LiveTrackingUseCase {
    controller: TrackingController,
    bus: Arc<PresenceBus>,
    settings: TrackingSettings,
}

impl LiveTrackingUseCase {
    /// Creates a new `LiveTrackingUseCase`.
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        bus: Arc<PresenceBus>,
        settings: TrackingSettings,
    ) -> Self {
        Self {
            controller: TrackingController::new(sessions),
            bus,
            settings,
        }
    }

    /// Opens a live feed onto a session's channel.
    ///
    /// Authorization is evaluated against current session state on every
    /// call; a reconnect after a drop goes through here again and is refused
    /// once the session is no longer active. The returned feed keeps
    /// folding counterpart samples into its board until `close` is called
    /// or the feed is dropped.
    pub async fn open_feed(
        &self,
        session_id: &str,
        identity: &str,
        display_name: &str,
    ) -> Result<LiveWalkFeed> {
        let grant = self.controller.authorize(session_id, identity).await?;
        let mut subscription = self.bus.subscribe(&grant.topic, identity).await;

        let board = Arc::new(RwLock::new(PositionBoard::new()));
        let cancel = CancellationToken::new();

        let pump_board = board.clone();
        let pump_cancel = cancel.clone();
        let pump_identity = identity.to_string();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = pump_cancel.cancelled() => break,
                    sample = subscription.next() => match sample {
                        Some(sample) => {
                            pump_board.write().await.observe(sample);
                        }
                        None => {
                            // Channel torn down; the client is expected to
                            // re-authorize and resubscribe, not to retry here.
                            tracing::debug!(
                                target: "tracking",
                                "feed for '{}' ended with the channel",
                                pump_identity
                            );
                            break;
                        }
                    }
                }
            }
        });

        let publisher = PositionPublisher {
            bus: self.bus.clone(),
            topic: grant.topic.clone(),
            publisher_id: identity.to_string(),
            role: grant.role,
            display_name: display_name.to_string(),
            min_interval: Duration::from_millis(self.settings.publish_debounce_ms),
            last_sent: Mutex::new(None),
        };

        tracing::info!(
            target: "tracking",
            "opened live feed for '{}' on '{}'",
            identity, grant.topic
        );
        Ok(LiveWalkFeed {
            grant,
            board,
            cancel,
            publisher,
        })
    }
}

/// One participant's live view of a walk.
///
/// Dropping the feed releases its subscription promptly.
#[derive(Debug)]
pub struct LiveWalkFeed {
    grant: ChannelGrant,
    board: Arc<RwLock<PositionBoard>>,
    cancel: CancellationToken,
    publisher: PositionPublisher,
}

impl LiveWalkFeed {
    /// The authorization this feed was opened under.
    pub fn grant(&self) -> &ChannelGrant {
        &self.grant
    }

    /// The debounced publishing handle for this participant.
    pub fn publisher(&self) -> &PositionPublisher {
        &self.publisher
    }

    /// Latest position of every other publisher on the channel.
    pub async fn positions(&self) -> Vec<PositionSample> {
        self.board.read().await.snapshot()
    }

    /// Latest position of the counterpart, when one has arrived.
    pub async fn counterpart_position(&self) -> Option<PositionSample> {
        self.board
            .read()
            .await
            .latest_for(&self.grant.counterpart_id)
            .cloned()
    }

    /// Closes the feed and releases the subscription.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for LiveWalkFeed {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Fire-and-forget position publishing with sender-side debounce.
#[derive(Debug)]
pub struct PositionPublisher {
    bus: Arc<PresenceBus>,
    topic: String,
    publisher_id: String,
    role: ParticipantRole,
    display_name: String,
    min_interval: Duration,
    last_sent: Mutex<Option<Instant>>,
}

impl PositionPublisher {
    /// Publishes a coordinate, stamping it with the current time.
    ///
    /// Returns `false` when the sample was debounced because the previous
    /// publish was less than the configured interval ago. The bus itself
    /// never pushes back; this is the only rate bound.
    pub async fn publish(&self, latitude: f64, longitude: f64) -> bool {
        {
            let mut last_sent = self.last_sent.lock().await;
            if let Some(last) = *last_sent {
                if last.elapsed() < self.min_interval {
                    tracing::trace!(
                        target: "tracking",
                        "debounced sample from '{}'",
                        self.publisher_id
                    );
                    return false;
                }
            }
            *last_sent = Some(Instant::now());
        }

        let sample = PositionSample::now(
            &self.publisher_id,
            self.role,
            &self.display_name,
            latitude,
            longitude,
        );
        self.bus.publish(&self.topic, sample).await;
        true
    }
}
