//! Platform backend trait definition

use async_trait::async_trait;

use crate::error::{
    ConnectError, CurrentSsidError, ForceWifiUsageError, RadioError, RemoveNetworkError,
    ScanError, Unsupported,
};
use crate::wifi::types::{ConnectionRequest, Operation, Platform, WifiEntry};

/// The full operation set of the facade, implemented once per platform
///
/// A backend that cannot perform an operation must reject it with
/// [`Unsupported`] immediately rather than doing nothing.
#[async_trait]
pub trait WifiBackend: Send + Sync {
    fn platform(&self) -> Platform;

    /// Whether `operation` can run here; every other call ends in [`Unsupported`]
    fn supports(&self, operation: Operation) -> bool;

    /// Join a network by exact SSID, with a password unless the network is open
    async fn connect_to_protected_ssid(&self, request: &ConnectionRequest)
    -> Result<(), ConnectError>;

    async fn connect_to_ssid(&self, ssid: &str) -> Result<(), ConnectError>;

    async fn connect_to_ssid_prefix(&self, prefix: &str) -> Result<(), ConnectError>;

    async fn connect_to_protected_ssid_prefix(
        &self,
        request: &ConnectionRequest,
    ) -> Result<(), ConnectError>;

    async fn disconnect_from_ssid(&self, prefix: &str) -> Result<(), Unsupported>;

    async fn get_current_wifi_ssid(&self) -> Result<String, CurrentSsidError>;

    /// Most recent scan results, without requesting a new scan
    async fn load_wifi_list(&self) -> Result<Vec<WifiEntry>, ScanError>;

    /// Request a fresh scan, then return its results
    async fn re_scan_and_load_wifi_list(&self) -> Result<Vec<WifiEntry>, ScanError>;

    async fn is_enabled(&self) -> Result<bool, Unsupported>;

    async fn set_enabled(&self, enabled: bool) -> Result<(), RadioError>;

    /// Whether any network path (not necessarily WiFi) is usable
    async fn connection_status(&self) -> Result<bool, Unsupported>;

    /// Drop the current association, keeping its saved configuration
    async fn disconnect(&self) -> Result<(), RadioError>;

    async fn is_remove_wifi_network(&self, ssid: &str) -> Result<bool, RemoveNetworkError>;

    async fn force_wifi_usage(&self, use_wifi: bool) -> Result<(), ForceWifiUsageError>;
}
