//! Android backend
//!
//! Implements the scan, configure, connect and remove lifecycle on top of the
//! Android system services, and rejects the iOS-only join operations.

mod connection;
mod listener;
pub mod native;
pub mod profile;
mod scanning;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{ANDROID_M_SDK, BridgeConfig};
use crate::error::{
    ConnectError, CurrentSsidError, ForceWifiUsageError, RadioError, RemoveNetworkError,
    ScanError, Unsupported,
};
use crate::wifi::backend::WifiBackend;
use crate::wifi::types::{ConnectionRequest, Operation, Platform, WifiEntry};
use native::AndroidSystem;
use profile::unquote;

/// Why scanning is not allowed right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocationDenied {
    PermissionMissing,
    ServicesOff,
}

impl LocationDenied {
    fn into_connect_error(self) -> ConnectError {
        match self {
            LocationDenied::PermissionMissing => ConnectError::LocationPermissionMissing,
            LocationDenied::ServicesOff => ConnectError::LocationServicesOff,
        }
    }

    fn into_scan_error(self) -> ScanError {
        match self {
            LocationDenied::PermissionMissing => ScanError::LocationPermissionMissing,
            LocationDenied::ServicesOff => ScanError::LocationServicesOff,
        }
    }
}

pub struct AndroidBackend {
    system: Arc<dyn AndroidSystem>,
    config: BridgeConfig,
}

impl AndroidBackend {
    pub fn new(system: Arc<dyn AndroidSystem>, config: BridgeConfig) -> Self {
        Self { system, config }
    }

    fn unsupported(&self, operation: Operation) -> Unsupported {
        Unsupported::new(operation, Platform::Android)
    }

    /// Scanning needs the location permission and location services from Android 6 on
    fn check_location_access(&self) -> Result<(), LocationDenied> {
        if self.system.sdk_version() < ANDROID_M_SDK {
            return Ok(());
        }
        if !self.system.has_location_permission() {
            return Err(LocationDenied::PermissionMissing);
        }
        if !self.system.is_location_enabled() {
            return Err(LocationDenied::ServicesOff);
        }
        Ok(())
    }

    async fn remove_network(&self, ssid: &str) -> Result<bool, RemoveNetworkError> {
        let wifi = self
            .system
            .wifi_service()
            .ok_or(RemoveNetworkError::CouldNotGetWifiManager)?;
        if self.system.connectivity_service().is_none() {
            return Err(RemoveNetworkError::CouldNotGetConnectivityManager);
        }

        let ids: Vec<_> = wifi
            .configured_networks()
            .await
            .into_iter()
            .filter(|config| config.is_for(ssid))
            .filter_map(|config| config.network_id)
            .collect();
        if ids.is_empty() {
            debug!(%ssid, "no saved configuration to remove");
            return Ok(false);
        }

        let associated = wifi
            .connection_info()
            .await
            .is_some_and(|info| unquote(&info.ssid) == ssid);
        if associated && !wifi.disconnect().await {
            warn!(%ssid, "could not disconnect, keeping saved configuration");
            return Ok(false);
        }

        let mut removed = true;
        for id in ids {
            if !wifi.remove_network(id).await {
                warn!(%ssid, ?id, "saved configuration could not be removed");
                removed = false;
            }
        }
        info!(%ssid, removed, "removed saved network");
        Ok(removed)
    }

    async fn bind_to_wifi(&self, use_wifi: bool) -> Result<(), ForceWifiUsageError> {
        let connectivity = self
            .system
            .connectivity_service()
            .ok_or(ForceWifiUsageError::CouldNotGetConnectivityManager)?;
        connectivity.bind_process_to_wifi(use_wifi).await;
        info!(use_wifi, "process network binding changed");
        Ok(())
    }
}

#[async_trait]
impl WifiBackend for AndroidBackend {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn supports(&self, operation: Operation) -> bool {
        !matches!(
            operation,
            Operation::ConnectToSsid
                | Operation::ConnectToSsidPrefix
                | Operation::ConnectToProtectedSsidPrefix
                | Operation::DisconnectFromSsid
        )
    }

    async fn connect_to_protected_ssid(
        &self,
        request: &ConnectionRequest,
    ) -> Result<(), ConnectError> {
        self.connect(request).await
    }

    async fn connect_to_ssid(&self, _ssid: &str) -> Result<(), ConnectError> {
        Err(self.unsupported(Operation::ConnectToSsid).into())
    }

    async fn connect_to_ssid_prefix(&self, _prefix: &str) -> Result<(), ConnectError> {
        Err(self.unsupported(Operation::ConnectToSsidPrefix).into())
    }

    async fn connect_to_protected_ssid_prefix(
        &self,
        _request: &ConnectionRequest,
    ) -> Result<(), ConnectError> {
        Err(self.unsupported(Operation::ConnectToProtectedSsidPrefix).into())
    }

    async fn disconnect_from_ssid(&self, _prefix: &str) -> Result<(), Unsupported> {
        Err(self.unsupported(Operation::DisconnectFromSsid))
    }

    async fn get_current_wifi_ssid(&self) -> Result<String, CurrentSsidError> {
        self.current_ssid().await
    }

    async fn load_wifi_list(&self) -> Result<Vec<WifiEntry>, ScanError> {
        self.scan(false).await
    }

    async fn re_scan_and_load_wifi_list(&self) -> Result<Vec<WifiEntry>, ScanError> {
        self.scan(true).await
    }

    async fn is_enabled(&self) -> Result<bool, Unsupported> {
        Ok(self.radio_enabled().await)
    }

    async fn set_enabled(&self, enabled: bool) -> Result<(), RadioError> {
        self.set_radio(enabled).await
    }

    async fn connection_status(&self) -> Result<bool, Unsupported> {
        Ok(match self.system.connectivity_service() {
            Some(connectivity) => connectivity.is_network_usable().await,
            None => false,
        })
    }

    async fn disconnect(&self) -> Result<(), RadioError> {
        self.drop_association().await
    }

    async fn is_remove_wifi_network(&self, ssid: &str) -> Result<bool, RemoveNetworkError> {
        self.remove_network(ssid).await
    }

    async fn force_wifi_usage(&self, use_wifi: bool) -> Result<(), ForceWifiUsageError> {
        self.bind_to_wifi(use_wifi).await
    }
}
