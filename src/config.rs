/// Centralized configuration constants for wifi-bridge
use serde::Deserialize;
use std::time::Duration;

// Timing
pub const CONNECTION_TIMEOUT_SECS: u64 = 60;

// Android API levels that change what an app may do
pub const ANDROID_M_SDK: u32 = 23; // runtime location permission for scans
pub const ANDROID_O_MR1_SDK: u32 = 27; // location permission for reading the SSID
pub const ANDROID_Q_SDK: u32 = 29; // apps can no longer toggle the radio

// Foreground scan throttling (Android 9+)
pub const SCAN_THROTTLE_LIMIT: usize = 4;
pub const SCAN_THROTTLE_WINDOW_SECS: u64 = 120;

// iOS
pub const IOS_PREFIX_JOIN_MIN_VERSION: u32 = 13;

/// Runtime settings for the platform backends
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// How long to wait for an association outcome after asking the OS to connect
    pub connect_timeout_secs: u64,
    /// Join iOS hotspot configurations only for the lifetime of the app
    pub join_once: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECTION_TIMEOUT_SECS,
            join_once: false,
        }
    }
}

impl BridgeConfig {
    /// Parse settings from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = BridgeConfig::from_json(r#"{ "join_once": true }"#).unwrap();
        assert!(config.join_once);
        assert_eq!(config.connect_timeout(), Duration::from_secs(CONNECTION_TIMEOUT_SECS));

        let config = BridgeConfig::from_json(r#"{ "connect_timeout_secs": 5 }"#).unwrap();
        assert!(!config.join_once);
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
    }
}
