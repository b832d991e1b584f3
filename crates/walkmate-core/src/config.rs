//! Application settings.
//!
//! Plain serde structs with defaults; the infrastructure crate owns loading
//! them from the configuration file.

use serde::{Deserialize, Serialize};

/// Settings for the matching engine.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MatchingSettings {
    /// How many times a conditional update is re-attempted after a version
    /// conflict before the operation is surfaced as contended.
    #[serde(default = "default_max_commit_retries")]
    pub max_commit_retries: u32,
}

fn default_max_commit_retries() -> u32 {
    3
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_commit_retries: default_max_commit_retries(),
        }
    }
}

/// Settings for live tracking.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TrackingSettings {
    /// Per-topic broadcast channel capacity. A slow subscriber that falls
    /// more than this many samples behind skips ahead (at-most-once).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Minimum interval between published samples from one participant.
    /// Samples arriving faster than this are dropped at the publisher.
    #[serde(default = "default_publish_debounce_ms")]
    pub publish_debounce_ms: u64,
}

fn default_channel_capacity() -> usize {
    64
}

fn default_publish_debounce_ms() -> u64 {
    2000
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            publish_debounce_ms: default_publish_debounce_ms(),
        }
    }
}

/// Root configuration for the application.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RootConfig {
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub tracking: TrackingSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RootConfig::default();
        assert_eq!(config.matching.max_commit_retries, 3);
        assert_eq!(config.tracking.channel_capacity, 64);
        assert_eq!(config.tracking.publish_debounce_ms, 2000);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: RootConfig = toml::from_str(
            r#"
            [tracking]
            publish_debounce_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.tracking.publish_debounce_ms, 500);
        assert_eq!(config.tracking.channel_capacity, 64);
        assert_eq!(config.matching.max_commit_retries, 3);
    }
}
