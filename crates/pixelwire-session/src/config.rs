use std::time::Duration;

use pixelwire_frame::{PixelRange, ProtocolRevision};
use pixelwire_transport::LinkConfig;
use serde::{Deserialize, Serialize};

/// Default liveness tick period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Silent ticks tolerated before a session is considered lost.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 10;

/// Device identifiers never worth opening.
pub const DEFAULT_DENY_IDS: &[&str] = &["/dev/tty.Bluetooth-Incoming-Port"];

/// Configuration for sessions and device arbitration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Liveness tick period. Serialized in milliseconds. Default: 1s.
    #[serde(rename = "tick_interval_ms", with = "millis")]
    pub tick_interval: Duration,
    /// Consecutive silent ticks that end a session. Default: 10.
    pub failure_threshold: u32,
    /// Wire layout used for every frame. Default: v2.
    pub revision: ProtocolRevision,
    /// Candidates with these identifiers are dropped on registration.
    pub deny_ids: Vec<String>,
    /// Pixels turned off by `shutdown`. Default: 0..=11.
    pub all_off_range: PixelRange,
    /// Line parameters for every opened link.
    pub link: LinkConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            revision: ProtocolRevision::default(),
            deny_ids: DEFAULT_DENY_IDS.iter().map(|id| id.to_string()).collect(),
            all_off_range: PixelRange::new(0, 11),
            link: LinkConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Effective threshold; zero is treated as one.
    pub fn threshold(&self) -> u32 {
        self.failure_threshold.max(1)
    }

    pub fn is_denied(&self, id: &str) -> bool {
        self.deny_ids.iter().any(|denied| denied == id)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis().try_into().unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.threshold(), 10);
        assert_eq!(config.revision, ProtocolRevision::V2);
        assert!(config.is_denied("/dev/tty.Bluetooth-Incoming-Port"));
        assert!(!config.is_denied("/dev/ttyUSB0"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "tick_interval_ms": 250, "failure_threshold": 2, "revision": "v1" }"#)
                .unwrap();
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.failure_threshold, 2);
        assert_eq!(config.revision, ProtocolRevision::V1);
        assert_eq!(config.link, LinkConfig::default());
    }

    #[test]
    fn zero_threshold_behaves_as_one() {
        let config = SessionConfig {
            failure_threshold: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.threshold(), 1);
    }
}
