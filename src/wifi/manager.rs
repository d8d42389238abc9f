//! The WiFi control facade
//!
//! `WifiManager` is the single entry point application code talks to. It owns
//! one platform backend, chosen at runtime, and forwards every call to it. It
//! never queues, serializes or retries calls: two concurrent connects race at
//! the OS, and each call ends in exactly one success value or one error.

use secrecy::SecretString;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::BridgeConfig;
use crate::error::{
    ConnectError, CurrentSsidError, ErrorTag, ForceWifiUsageError, RadioError,
    RemoveNetworkError, ScanError, Unsupported,
};
use crate::wifi::android::AndroidBackend;
use crate::wifi::android::native::AndroidSystem;
use crate::wifi::backend::WifiBackend;
use crate::wifi::ios::IosBackend;
use crate::wifi::ios::hotspot::HotspotService;
use crate::wifi::scanning::wifi_list_to_json;
use crate::wifi::types::{ConnectionRequest, Operation, Platform, WifiEntry};

/// Native services of the platform the app runs on
pub enum PlatformServices {
    Android(Arc<dyn AndroidSystem>),
    Ios(Arc<dyn HotspotService>),
}

#[derive(Clone)]
pub struct WifiManager {
    backend: Arc<dyn WifiBackend>,
}

impl WifiManager {
    pub fn new(backend: Arc<dyn WifiBackend>) -> Self {
        Self { backend }
    }

    /// Pick the backend matching the services the host provides
    pub fn for_platform(services: PlatformServices, config: BridgeConfig) -> Self {
        let backend: Arc<dyn WifiBackend> = match services {
            PlatformServices::Android(system) => Arc::new(AndroidBackend::new(system, config)),
            PlatformServices::Ios(hotspot) => Arc::new(IosBackend::new(hotspot, config)),
        };
        info!(platform = %backend.platform(), "wifi manager ready");
        Self::new(backend)
    }

    pub fn platform(&self) -> Platform {
        self.backend.platform()
    }

    /// Connect to a network; `None` as password joins an open network
    pub async fn connect_to_protected_ssid(
        &self,
        ssid: &str,
        password: Option<SecretString>,
        is_wep: bool,
    ) -> Result<(), ConnectError> {
        let request = ConnectionRequest::protected(ssid, password, is_wep);
        let result = self.backend.connect_to_protected_ssid(&request).await;
        log_outcome("connectToProtectedSSID", &result);
        result
    }

    /// iOS only
    pub async fn connect_to_ssid(&self, ssid: &str) -> Result<(), ConnectError> {
        let result = self.backend.connect_to_ssid(ssid).await;
        log_outcome("connectToSSID", &result);
        result
    }

    /// iOS only
    pub async fn connect_to_ssid_prefix(&self, prefix: &str) -> Result<(), ConnectError> {
        let result = self.backend.connect_to_ssid_prefix(prefix).await;
        log_outcome("connectToSSIDPrefix", &result);
        result
    }

    /// iOS only
    pub async fn connect_to_protected_ssid_prefix(
        &self,
        prefix: &str,
        password: Option<SecretString>,
        is_wep: bool,
    ) -> Result<(), ConnectError> {
        let request = ConnectionRequest::protected(prefix, password, is_wep).prefix();
        let result = self.backend.connect_to_protected_ssid_prefix(&request).await;
        log_outcome("connectToProtectedSSIDPrefix", &result);
        result
    }

    /// iOS only
    pub async fn disconnect_from_ssid(&self, prefix: &str) -> Result<(), Unsupported> {
        self.backend.disconnect_from_ssid(prefix).await
    }

    pub async fn get_current_wifi_ssid(&self) -> Result<String, CurrentSsidError> {
        self.backend.get_current_wifi_ssid().await
    }

    /// Android only
    pub async fn load_wifi_list(&self) -> Result<Vec<WifiEntry>, ScanError> {
        self.backend.load_wifi_list().await
    }

    /// Android only. Subject to the OS scan throttle; callers must tolerate
    /// `CouldNotScan` when scanning too often.
    pub async fn re_scan_and_load_wifi_list(&self) -> Result<Vec<WifiEntry>, ScanError> {
        self.backend.re_scan_and_load_wifi_list().await
    }

    /// Android only
    pub async fn is_enabled(&self) -> Result<bool, Unsupported> {
        self.backend.is_enabled().await
    }

    /// Android only. Fails with `CouldNotEnableWifi` from Android 10 on, where
    /// apps may no longer switch the radio.
    pub async fn set_enabled(&self, enabled: bool) -> Result<(), RadioError> {
        let result = self.backend.set_enabled(enabled).await;
        log_outcome("setEnabled", &result);
        result
    }

    /// Android only
    pub async fn connection_status(&self) -> Result<bool, Unsupported> {
        self.backend.connection_status().await
    }

    /// Android only
    pub async fn disconnect(&self) -> Result<(), RadioError> {
        let result = self.backend.disconnect().await;
        log_outcome("disconnect", &result);
        result
    }

    /// Android only. `Ok(false)` when no configuration exists for `ssid`.
    pub async fn is_remove_wifi_network(&self, ssid: &str) -> Result<bool, RemoveNetworkError> {
        let result = self.backend.is_remove_wifi_network(ssid).await;
        log_outcome("isRemoveWifiNetwork", &result);
        result
    }

    /// Android only. The binding outlives WiFi disconnects; turn it off
    /// explicitly once done talking to the local network.
    pub async fn force_wifi_usage(&self, use_wifi: bool) -> Result<(), ForceWifiUsageError> {
        let result = self.backend.force_wifi_usage(use_wifi).await;
        log_outcome("forceWifiUsage", &result);
        result
    }

    /// Callback form of [`Self::load_wifi_list`]; success receives a JSON array
    pub fn load_wifi_list_with<S, E>(&self, on_success: S, on_error: E) -> JoinHandle<()>
    where
        S: FnOnce(String) + Send + 'static,
        E: FnOnce(ScanError) + Send + 'static,
    {
        let manager = self.clone();
        tokio::spawn(async move {
            deliver_list(manager.load_wifi_list().await, on_success, on_error);
        })
    }

    /// Callback form of [`Self::re_scan_and_load_wifi_list`]
    pub fn re_scan_and_load_wifi_list_with<S, E>(
        &self,
        on_success: S,
        on_error: E,
    ) -> JoinHandle<()>
    where
        S: FnOnce(String) + Send + 'static,
        E: FnOnce(ScanError) + Send + 'static,
    {
        let manager = self.clone();
        tokio::spawn(async move {
            deliver_list(
                manager.re_scan_and_load_wifi_list().await,
                on_success,
                on_error,
            );
        })
    }

    /// Callback form of [`Self::is_enabled`]
    ///
    /// Fails up front where the platform cannot report the radio state.
    pub fn is_enabled_with<F>(&self, callback: F) -> Result<JoinHandle<()>, Unsupported>
    where
        F: FnOnce(bool) + Send + 'static,
    {
        self.ensure_supported(Operation::IsEnabled)?;
        let manager = self.clone();
        Ok(tokio::spawn(async move {
            deliver_flag(manager.is_enabled().await, callback);
        }))
    }

    /// Callback form of [`Self::connection_status`]
    pub fn connection_status_with<F>(&self, callback: F) -> Result<JoinHandle<()>, Unsupported>
    where
        F: FnOnce(bool) + Send + 'static,
    {
        self.ensure_supported(Operation::ConnectionStatus)?;
        let manager = self.clone();
        Ok(tokio::spawn(async move {
            deliver_flag(manager.connection_status().await, callback);
        }))
    }

    fn ensure_supported(&self, operation: Operation) -> Result<(), Unsupported> {
        if self.backend.supports(operation) {
            Ok(())
        } else {
            Err(Unsupported::new(operation, self.platform()))
        }
    }
}

fn deliver_list<S, E>(result: Result<Vec<WifiEntry>, ScanError>, on_success: S, on_error: E)
where
    S: FnOnce(String),
    E: FnOnce(ScanError),
{
    match result {
        Ok(entries) => match wifi_list_to_json(&entries) {
            Ok(json) => on_success(json),
            // WifiEntry only holds strings and integers
            Err(err) => {
                warn!(%err, "could not serialize scan results");
                on_error(ScanError::CouldNotScan);
            }
        },
        Err(err) => on_error(err),
    }
}

fn deliver_flag<F: FnOnce(bool)>(result: Result<bool, Unsupported>, callback: F) {
    match result {
        Ok(flag) => callback(flag),
        Err(err) => warn!(%err, "flag not delivered"),
    }
}

fn log_outcome<T, E: ErrorTag>(operation: &str, result: &Result<T, E>) {
    match result {
        Ok(_) => debug!(operation, "succeeded"),
        Err(err) => info!(operation, error = err.tag(), "failed"),
    }
}
