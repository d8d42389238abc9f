//! In-memory stand-ins for the native services
//!
//! The simulators model what the real OS does closely enough to exercise every
//! backend path: radio power, networks in range, saved configurations,
//! association outcomes, process network binding and the Android foreground
//! scan throttle.

mod android;
mod ios;

use serde::Deserialize;

use crate::wifi::{FailureReason, WifiEntry};

pub use android::SimulatedAndroid;
pub use ios::SimulatedHotspot;

/// How the simulated OS answers an association attempt once the key matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssociationBehavior {
    #[default]
    Normal,
    Fail(FailureReason),
    /// Never report an outcome
    NoResponse,
}

/// An access point in range of the simulated device
#[derive(Debug, Clone, Deserialize)]
pub struct SimNetwork {
    #[serde(flatten)]
    pub entry: WifiEntry,
    /// `None` for open networks
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub behavior: AssociationBehavior,
}

impl SimNetwork {
    pub fn open(ssid: &str, bssid: &str) -> Self {
        Self {
            entry: WifiEntry {
                ssid: ssid.to_string(),
                bssid: bssid.to_string(),
                capabilities: "[ESS]".to_string(),
                frequency: 2412,
                level: -55,
                timestamp: 0,
            },
            password: None,
            behavior: AssociationBehavior::Normal,
        }
    }

    pub fn wpa2(ssid: &str, bssid: &str, password: &str) -> Self {
        let mut network = Self::open(ssid, bssid);
        network.entry.capabilities = "[WPA2-PSK-CCMP][RSN-PSK-CCMP][ESS]".to_string();
        network.entry.frequency = 5180;
        network.password = Some(password.to_string());
        network
    }

    pub fn with_capabilities(mut self, capabilities: &str) -> Self {
        self.entry.capabilities = capabilities.to_string();
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.entry.level = level;
        self
    }

    pub fn with_behavior(mut self, behavior: AssociationBehavior) -> Self {
        self.behavior = behavior;
        self
    }
}

/// Initial device state, loadable from JSON
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Fixture {
    pub networks: Vec<SimNetwork>,
    /// SSIDs with a saved configuration
    pub saved: Vec<String>,
    /// SSID the device starts associated with
    pub connected: Option<String>,
    pub wifi_disabled: bool,
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// A small neighbourhood used when no fixture is given
    pub fn demo() -> Self {
        Self {
            networks: vec![
                SimNetwork::wpa2("Home", "02:00:00:00:00:01", "correct horse").with_level(-42),
                SimNetwork::wpa2("Home", "02:00:00:00:00:02", "correct horse").with_level(-71),
                SimNetwork::open("Cafe Guest", "02:00:00:00:00:03").with_level(-66),
                SimNetwork::open("Cam-4F2A", "02:00:00:00:00:04").with_level(-50),
                SimNetwork::wpa2("Office", "02:00:00:00:00:05", "unused")
                    .with_capabilities("[WPA2-EAP-CCMP][ESS]")
                    .with_level(-80),
            ],
            saved: vec!["Cafe Guest".to_string()],
            connected: None,
            wifi_disabled: false,
        }
    }

    pub(crate) fn network(&self, ssid: &str) -> Option<&SimNetwork> {
        self.networks.iter().find(|network| network.entry.ssid == ssid)
    }
}
