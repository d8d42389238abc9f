use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::sim::{AssociationBehavior, Fixture, SimNetwork};
use crate::wifi::ios::hotspot::{HotspotConfiguration, HotspotError, HotspotService};

struct HotspotState {
    networks: Vec<SimNetwork>,
    current: Option<String>,
    /// SSIDs (or prefixes) of applied configurations
    configurations: Vec<String>,
    user_denies: bool,
}

/// A simulated iOS device
pub struct SimulatedHotspot {
    os_version: u32,
    state: Mutex<HotspotState>,
}

impl SimulatedHotspot {
    pub fn new(os_version: u32) -> Self {
        Self {
            os_version,
            state: Mutex::new(HotspotState {
                networks: Vec::new(),
                current: None,
                configurations: Vec::new(),
                user_denies: false,
            }),
        }
    }

    pub fn from_fixture(os_version: u32, fixture: &Fixture) -> Self {
        let device = fixture
            .networks
            .iter()
            .cloned()
            .fold(Self::new(os_version), Self::with_network);
        device.state().current = fixture.connected.clone();
        device
    }

    pub fn with_network(self, network: SimNetwork) -> Self {
        self.state().networks.push(network);
        self
    }

    fn state(&self) -> MutexGuard<'_, HotspotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next join prompts come back denied
    pub fn set_user_denies(&self, denies: bool) {
        self.state().user_denies = denies;
    }

    pub fn current(&self) -> Option<String> {
        self.state().current.clone()
    }

    pub fn configurations(&self) -> Vec<String> {
        self.state().configurations.clone()
    }
}

fn validate_passphrase(configuration: &HotspotConfiguration) -> Result<(), HotspotError> {
    let Some(passphrase) = configuration.passphrase.as_ref() else {
        return Ok(());
    };
    let len = passphrase.expose_secret().len();
    if configuration.is_wep {
        if !matches!(len, 5 | 10 | 13 | 16 | 26 | 32) {
            return Err(HotspotError::InvalidWepPassphrase);
        }
    } else if !(8..=64).contains(&len) {
        return Err(HotspotError::InvalidWpaPassphrase);
    }
    Ok(())
}

#[async_trait]
impl HotspotService for SimulatedHotspot {
    fn os_major_version(&self) -> u32 {
        self.os_version
    }

    async fn apply_configuration(
        &self,
        configuration: HotspotConfiguration,
    ) -> Result<(), HotspotError> {
        let matches = |ssid: &str| {
            if configuration.match_prefix {
                ssid.starts_with(&configuration.ssid)
            } else {
                ssid == configuration.ssid
            }
        };

        let mut state = self.state();
        if state.user_denies {
            return Err(HotspotError::UserDenied);
        }
        if configuration.ssid.is_empty() {
            return Err(if configuration.match_prefix {
                HotspotError::InvalidSsidPrefix
            } else {
                HotspotError::InvalidSsid
            });
        }
        validate_passphrase(&configuration)?;
        if state.current.as_deref().is_some_and(matches) {
            return Err(HotspotError::AlreadyAssociated);
        }

        state.configurations.retain(|ssid| *ssid != configuration.ssid);
        state.configurations.push(configuration.ssid.clone());

        let candidate = state
            .networks
            .iter()
            .filter(|network| matches(&network.entry.ssid))
            .max_by_key(|network| network.entry.level)
            .cloned();
        // iOS reports success even when nothing in range matches
        let Some(network) = candidate else {
            debug!(ssid = %configuration.ssid, "no matching network in range");
            return Ok(());
        };

        let given = configuration
            .passphrase
            .as_ref()
            .map(|passphrase| passphrase.expose_secret().to_string());
        if network.password != given {
            return Err(if configuration.is_wep {
                HotspotError::InvalidWepPassphrase
            } else {
                HotspotError::InvalidWpaPassphrase
            });
        }

        match network.behavior {
            AssociationBehavior::Normal => {
                state.current = Some(network.entry.ssid);
                Ok(())
            }
            AssociationBehavior::Fail(_) => Err(HotspotError::Internal),
            AssociationBehavior::NoResponse => Ok(()),
        }
    }

    async fn remove_configuration(&self, ssid: &str) {
        let mut state = self.state();
        let before = state.configurations.len();
        state.configurations.retain(|configured| configured != ssid);
        let removed = state.configurations.len() < before;
        if removed && state.current.as_deref().is_some_and(|c| c.starts_with(ssid)) {
            state.current = None;
        }
    }

    async fn current_ssid(&self) -> Option<String> {
        self.state().current.clone()
    }
}
