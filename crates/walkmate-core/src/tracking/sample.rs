//! Position sample types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the session a participant is on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParticipantRole {
    Owner,
    Walker,
}

/// One timestamped coordinate broadcast by a session participant.
///
/// Samples are ephemeral: they exist only for delivery, and each publisher's
/// most recent sample supersedes its prior one for display purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Identity of the publishing participant
    pub publisher_id: String,
    /// The publisher's side of the session
    pub role: ParticipantRole,
    /// Display name shown next to the marker
    pub display_name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// When the coordinate was taken
    pub recorded_at: DateTime<Utc>,
}

impl PositionSample {
    /// Creates a sample stamped with the current time.
    pub fn now(
        publisher_id: impl Into<String>,
        role: ParticipantRole,
        display_name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            publisher_id: publisher_id.into(),
            role,
            display_name: display_name.into(),
            latitude,
            longitude,
            recorded_at: Utc::now(),
        }
    }
}
