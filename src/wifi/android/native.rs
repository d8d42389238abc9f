//! Boundary to the Android system services
//!
//! These traits stand in for `Context`, `WifiManager` and `ConnectivityManager`.
//! Implementations live on the native side of the bridge; the backend only
//! ever talks to the OS through them.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::wifi::android::profile::{NetworkConfig, NetworkId};
use crate::wifi::types::{ConnectionEvent, WifiEntry};

/// SSID reported by the OS when the caller may not see the real one
pub const UNKNOWN_SSID: &str = "<unknown ssid>";

/// Device level state and service handle acquisition
pub trait AndroidSystem: Send + Sync {
    /// `Build.VERSION.SDK_INT`
    fn sdk_version(&self) -> u32;

    fn has_location_permission(&self) -> bool;

    fn is_location_enabled(&self) -> bool;

    /// `None` when the system service cannot be obtained
    fn wifi_service(&self) -> Option<Arc<dyn WifiService>>;

    /// `None` when the system service cannot be obtained
    fn connectivity_service(&self) -> Option<Arc<dyn ConnectivityService>>;
}

/// The current association as reported by the OS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Quoted when the name is valid UTF-8, e.g. `"Home"`
    pub ssid: String,
    pub bssid: Option<String>,
    pub network_id: Option<NetworkId>,
}

#[async_trait]
pub trait WifiService: Send + Sync {
    async fn is_wifi_enabled(&self) -> bool;

    /// Ignored (returns `false`) from Android 10 on
    async fn set_wifi_enabled(&self, enabled: bool) -> bool;

    /// `false` when the request is rejected, including by scan throttling
    async fn start_scan(&self) -> bool;

    async fn scan_results(&self) -> Vec<WifiEntry>;

    async fn connection_info(&self) -> Option<ConnectionInfo>;

    async fn configured_networks(&self) -> Vec<NetworkConfig>;

    /// Adds the configuration, or updates it when `network_id` is set
    async fn add_or_update_network(&self, config: &NetworkConfig) -> Option<NetworkId>;

    /// Starts associating; the outcome arrives as a [`ConnectionEvent`]
    async fn enable_network(&self, id: NetworkId, disable_others: bool) -> bool;

    async fn remove_network(&self, id: NetworkId) -> bool;

    async fn disconnect(&self) -> bool;

    /// Receive connection events from now on
    async fn subscribe(&self) -> UnboundedReceiver<ConnectionEvent>;
}

#[async_trait]
pub trait ConnectivityService: Send + Sync {
    /// Whether the active network, of any transport, can carry traffic
    async fn is_network_usable(&self) -> bool;

    /// Bind (or unbind) all process traffic to the WiFi network
    async fn bind_process_to_wifi(&self, bind: bool);

    async fn is_bound_to_wifi(&self) -> bool;
}
