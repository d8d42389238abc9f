use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::Instant;
use tracing::debug;

use crate::config::{
    ANDROID_O_MR1_SDK, ANDROID_Q_SDK, SCAN_THROTTLE_LIMIT, SCAN_THROTTLE_WINDOW_SECS,
};
use crate::sim::{AssociationBehavior, Fixture, SimNetwork};
use crate::wifi::android::native::{
    AndroidSystem, ConnectionInfo, ConnectivityService, UNKNOWN_SSID, WifiService,
};
use crate::wifi::android::profile::{KeyManagement, NetworkConfig, NetworkId, quote, unquote};
use crate::wifi::{ConnectionEvent, FailureReason, WifiEntry};

#[derive(Debug)]
struct SavedNetwork {
    id: NetworkId,
    /// Quoted
    ssid: String,
    bssid: Option<String>,
    key_management: KeyManagement,
    /// Key material as the app handed it over (quoted passphrase or WEP key)
    key: Option<String>,
    hidden: bool,
}

#[derive(Debug)]
struct Association {
    network_id: NetworkId,
    ssid: String,
    bssid: String,
}

struct AndroidState {
    sdk_version: u32,
    location_permission: bool,
    location_enabled: bool,
    wifi_service_available: bool,
    connectivity_service_available: bool,
    wifi_enabled: bool,
    mobile_data: bool,
    networks: Vec<SimNetwork>,
    scan_cache: Vec<WifiEntry>,
    scan_history: VecDeque<Instant>,
    scans_started: usize,
    saved: Vec<SavedNetwork>,
    next_network_id: i32,
    current: Option<Association>,
    bound_to_wifi: bool,
    listeners: Vec<UnboundedSender<ConnectionEvent>>,
    reject_disconnect: bool,
    reject_add_network: bool,
    reject_enable_network: bool,
}

impl AndroidState {
    fn emit(&mut self, event: ConnectionEvent) {
        debug!(?event, "simulated connection event");
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn save(&mut self, config: &NetworkConfig) -> NetworkId {
        let key = match config.key_management {
            KeyManagement::None => None,
            KeyManagement::WpaPsk => config.pre_shared_key.as_ref(),
            KeyManagement::Wep => config.wep_key.as_ref(),
        }
        .map(|key| key.expose_secret().to_string());

        let id = match config.network_id {
            Some(id) => {
                self.saved.retain(|saved| saved.id != id);
                id
            }
            None => {
                self.next_network_id += 1;
                NetworkId(self.next_network_id)
            }
        };
        self.saved.push(SavedNetwork {
            id,
            ssid: config.ssid.clone(),
            bssid: config.bssid.clone(),
            key_management: config.key_management,
            key,
            hidden: config.hidden,
        });
        id
    }

    fn drop_association(&mut self) {
        if let Some(association) = self.current.take() {
            self.emit(ConnectionEvent::Disconnected(association.ssid));
        }
    }

    fn associate(&mut self, id: NetworkId) {
        let Some(saved) = self.saved.iter().find(|saved| saved.id == id) else {
            return;
        };
        let ssid = unquote(&saved.ssid).to_string();
        let given = saved.key.as_deref().map(unquote).map(str::to_string);

        let in_range = self
            .networks
            .iter()
            .filter(|network| network.entry.ssid == ssid)
            .max_by_key(|network| network.entry.level)
            .cloned();
        let Some(network) = in_range else {
            self.emit(ConnectionEvent::Failed {
                ssid,
                reason: FailureReason::AssociationRejected,
            });
            return;
        };

        if network.password != given {
            self.emit(ConnectionEvent::Failed {
                ssid,
                reason: FailureReason::Authentication,
            });
            return;
        }

        match network.behavior {
            AssociationBehavior::Normal => {
                self.current = Some(Association {
                    network_id: id,
                    ssid: ssid.clone(),
                    bssid: network.entry.bssid.clone(),
                });
                self.emit(ConnectionEvent::Connected(ssid));
            }
            AssociationBehavior::Fail(reason) => self.emit(ConnectionEvent::Failed { ssid, reason }),
            AssociationBehavior::NoResponse => debug!(%ssid, "simulated network stays silent"),
        }
    }
}

struct Shared {
    state: Mutex<AndroidState>,
    started: Instant,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, AndroidState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A simulated Android device
#[derive(Clone)]
pub struct SimulatedAndroid {
    shared: Arc<Shared>,
}

impl SimulatedAndroid {
    /// A device on the given API level with permissions granted and WiFi on
    pub fn new(sdk_version: u32) -> Self {
        let state = AndroidState {
            sdk_version,
            location_permission: true,
            location_enabled: true,
            wifi_service_available: true,
            connectivity_service_available: true,
            wifi_enabled: true,
            mobile_data: false,
            networks: Vec::new(),
            scan_cache: Vec::new(),
            scan_history: VecDeque::new(),
            scans_started: 0,
            saved: Vec::new(),
            next_network_id: 0,
            current: None,
            bound_to_wifi: false,
            listeners: Vec::new(),
            reject_disconnect: false,
            reject_add_network: false,
            reject_enable_network: false,
        };
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                started: Instant::now(),
            }),
        }
    }

    pub fn from_fixture(sdk_version: u32, fixture: &Fixture) -> Self {
        let device = fixture
            .networks
            .iter()
            .cloned()
            .fold(Self::new(sdk_version), Self::with_network);

        for ssid in &fixture.saved {
            device.save_network(ssid, fixture.network(ssid).and_then(|n| n.password.as_deref()));
        }
        if let Some(ssid) = &fixture.connected {
            device.associate_directly(ssid, fixture.network(ssid).and_then(|n| n.password.as_deref()));
        }
        device.set_wifi_enabled(!fixture.wifi_disabled);
        device
    }

    /// Put a network in range; it shows up in the cached scan results right away
    pub fn with_network(self, network: SimNetwork) -> Self {
        {
            let mut state = self.shared.state();
            state.scan_cache.push(network.entry.clone());
            state.networks.push(network);
        }
        self
    }

    /// Store a configuration the way a previous app session would have
    pub fn save_network(&self, ssid: &str, password: Option<&str>) -> NetworkId {
        let config = NetworkConfig {
            network_id: None,
            ssid: quote(ssid),
            bssid: None,
            key_management: if password.is_some() {
                KeyManagement::WpaPsk
            } else {
                KeyManagement::None
            },
            pre_shared_key: password.map(|p| SecretString::from(quote(p))),
            wep_key: None,
            hidden: false,
        };
        self.shared.state().save(&config)
    }

    /// Save and associate without going through the connect flow
    pub fn associate_directly(&self, ssid: &str, password: Option<&str>) {
        let id = self.save_network(ssid, password);
        self.shared.state().associate(id);
    }

    pub fn set_location_permission(&self, granted: bool) {
        self.shared.state().location_permission = granted;
    }

    pub fn set_location_enabled(&self, enabled: bool) {
        self.shared.state().location_enabled = enabled;
    }

    pub fn set_wifi_service_available(&self, available: bool) {
        self.shared.state().wifi_service_available = available;
    }

    pub fn set_connectivity_service_available(&self, available: bool) {
        self.shared.state().connectivity_service_available = available;
    }

    /// Flip the radio as the user would from system settings
    pub fn set_wifi_enabled(&self, enabled: bool) {
        let mut state = self.shared.state();
        state.wifi_enabled = enabled;
        if !enabled {
            state.drop_association();
        }
    }

    pub fn set_mobile_data(&self, available: bool) {
        self.shared.state().mobile_data = available;
    }

    pub fn remove_from_range(&self, ssid: &str) {
        self.shared
            .state()
            .networks
            .retain(|network| network.entry.ssid != ssid);
    }

    pub fn reject_disconnect(&self, reject: bool) {
        self.shared.state().reject_disconnect = reject;
    }

    pub fn reject_add_network(&self, reject: bool) {
        self.shared.state().reject_add_network = reject;
    }

    pub fn reject_enable_network(&self, reject: bool) {
        self.shared.state().reject_enable_network = reject;
    }

    pub fn wifi_enabled(&self) -> bool {
        self.shared.state().wifi_enabled
    }

    pub fn bound_to_wifi(&self) -> bool {
        self.shared.state().bound_to_wifi
    }

    pub fn connected_ssid(&self) -> Option<String> {
        self.shared
            .state()
            .current
            .as_ref()
            .map(|association| association.ssid.clone())
    }

    /// Unquoted SSIDs of all saved configurations
    pub fn saved_ssids(&self) -> Vec<String> {
        self.shared
            .state()
            .saved
            .iter()
            .map(|saved| unquote(&saved.ssid).to_string())
            .collect()
    }

    /// Scan requests the OS accepted
    pub fn scans_started(&self) -> usize {
        self.shared.state().scans_started
    }
}

impl AndroidSystem for SimulatedAndroid {
    fn sdk_version(&self) -> u32 {
        self.shared.state().sdk_version
    }

    fn has_location_permission(&self) -> bool {
        self.shared.state().location_permission
    }

    fn is_location_enabled(&self) -> bool {
        self.shared.state().location_enabled
    }

    fn wifi_service(&self) -> Option<Arc<dyn WifiService>> {
        if !self.shared.state().wifi_service_available {
            return None;
        }
        Some(Arc::new(SimulatedWifi(self.shared.clone())))
    }

    fn connectivity_service(&self) -> Option<Arc<dyn ConnectivityService>> {
        if !self.shared.state().connectivity_service_available {
            return None;
        }
        Some(Arc::new(SimulatedConnectivity(self.shared.clone())))
    }
}

struct SimulatedWifi(Arc<Shared>);

#[async_trait]
impl WifiService for SimulatedWifi {
    async fn is_wifi_enabled(&self) -> bool {
        self.0.state().wifi_enabled
    }

    async fn set_wifi_enabled(&self, enabled: bool) -> bool {
        let mut state = self.0.state();
        if state.sdk_version >= ANDROID_Q_SDK {
            return false;
        }
        state.wifi_enabled = enabled;
        if !enabled {
            state.drop_association();
        }
        true
    }

    async fn start_scan(&self) -> bool {
        let now = Instant::now();
        let window = Duration::from_secs(SCAN_THROTTLE_WINDOW_SECS);
        let timestamp = now.duration_since(self.0.started).as_micros() as u64;

        let mut state = self.0.state();
        if !state.wifi_enabled {
            return false;
        }
        while state
            .scan_history
            .front()
            .is_some_and(|started| now.duration_since(*started) >= window)
        {
            state.scan_history.pop_front();
        }
        if state.scan_history.len() >= SCAN_THROTTLE_LIMIT {
            debug!("simulated scan throttled");
            return false;
        }
        state.scan_history.push_back(now);
        state.scans_started += 1;

        let results = state
            .networks
            .iter()
            .map(|network| WifiEntry {
                timestamp,
                ..network.entry.clone()
            })
            .collect();
        state.scan_cache = results;
        true
    }

    async fn scan_results(&self) -> Vec<WifiEntry> {
        self.0.state().scan_cache.clone()
    }

    async fn connection_info(&self) -> Option<ConnectionInfo> {
        let state = self.0.state();
        let association = state.current.as_ref()?;
        let hidden = state.sdk_version >= ANDROID_O_MR1_SDK && !state.location_permission;
        Some(ConnectionInfo {
            ssid: if hidden {
                UNKNOWN_SSID.to_string()
            } else {
                quote(&association.ssid)
            },
            bssid: (!hidden).then(|| association.bssid.clone()),
            network_id: Some(association.network_id),
        })
    }

    async fn configured_networks(&self) -> Vec<NetworkConfig> {
        self.0
            .state()
            .saved
            .iter()
            .map(|saved| {
                let key = saved.key.as_ref().map(|key| SecretString::from(key.clone()));
                let (pre_shared_key, wep_key) = match saved.key_management {
                    KeyManagement::WpaPsk => (key, None),
                    KeyManagement::Wep => (None, key),
                    KeyManagement::None => (None, None),
                };
                NetworkConfig {
                    network_id: Some(saved.id),
                    ssid: saved.ssid.clone(),
                    bssid: saved.bssid.clone(),
                    key_management: saved.key_management,
                    pre_shared_key,
                    wep_key,
                    hidden: saved.hidden,
                }
            })
            .collect()
    }

    async fn add_or_update_network(&self, config: &NetworkConfig) -> Option<NetworkId> {
        let mut state = self.0.state();
        if state.reject_add_network {
            return None;
        }
        Some(state.save(config))
    }

    async fn enable_network(&self, id: NetworkId, _disable_others: bool) -> bool {
        let mut state = self.0.state();
        if state.reject_enable_network || !state.saved.iter().any(|saved| saved.id == id) {
            return false;
        }
        state.drop_association();
        state.associate(id);
        true
    }

    async fn remove_network(&self, id: NetworkId) -> bool {
        let mut state = self.0.state();
        let before = state.saved.len();
        state.saved.retain(|saved| saved.id != id);
        if state
            .current
            .as_ref()
            .is_some_and(|association| association.network_id == id)
        {
            state.drop_association();
        }
        state.saved.len() < before
    }

    async fn disconnect(&self) -> bool {
        let mut state = self.0.state();
        if state.reject_disconnect {
            return false;
        }
        state.drop_association();
        true
    }

    async fn subscribe(&self) -> UnboundedReceiver<ConnectionEvent> {
        let (tx, rx) = unbounded_channel();
        self.0.state().listeners.push(tx);
        rx
    }
}

struct SimulatedConnectivity(Arc<Shared>);

#[async_trait]
impl ConnectivityService for SimulatedConnectivity {
    async fn is_network_usable(&self) -> bool {
        let state = self.0.state();
        state.mobile_data || (state.wifi_enabled && state.current.is_some())
    }

    async fn bind_process_to_wifi(&self, bind: bool) {
        self.0.state().bound_to_wifi = bind;
    }

    async fn is_bound_to_wifi(&self) -> bool {
        self.0.state().bound_to_wifi
    }
}
