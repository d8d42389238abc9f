use tracing::{debug, info, instrument, warn};

use crate::config::{ANDROID_O_MR1_SDK, ANDROID_Q_SDK};
use crate::error::{ConnectError, CurrentSsidError, RadioError};
use crate::wifi::android::{AndroidBackend, LocationDenied};
use crate::wifi::android::listener::await_association;
use crate::wifi::android::native::{UNKNOWN_SSID, WifiService};
use crate::wifi::android::profile::{build_network_config, unquote};
use crate::wifi::scanning::strongest;
use crate::wifi::types::{ConnectionRequest, SecurityType, WifiEntry};

impl AndroidBackend {
    /// Scan, configure and join the network named in `request`
    #[instrument(skip_all, fields(ssid = %request.ssid, wep = request.is_wep))]
    pub(super) async fn connect(&self, request: &ConnectionRequest) -> Result<(), ConnectError> {
        self.check_location_access()
            .map_err(LocationDenied::into_connect_error)?;

        let wifi = self
            .system
            .wifi_service()
            .ok_or(ConnectError::CouldNotConnect)?;
        self.ensure_radio_on(wifi.as_ref()).await?;

        let current = wifi
            .connection_info()
            .await
            .map(|info| unquote(&info.ssid).to_string())
            .filter(|ssid| ssid != UNKNOWN_SSID && !ssid.is_empty());
        if current.as_deref() == Some(request.ssid.as_str()) {
            info!("already connected");
            return Ok(());
        }

        let results = self.scan_for_connect(wifi.as_ref()).await?;
        let target = strongest(&results, &request.ssid).ok_or_else(|| {
            info!("network not found in scan results");
            ConnectError::NotInRange
        })?;
        if target.security() == SecurityType::Enterprise {
            warn!(capabilities = %target.capabilities, "enterprise networks cannot be configured");
            return Err(ConnectError::DidNotFindNetworkByScanning);
        }

        if let Some(current) = current {
            debug!(%current, "disconnecting from current network");
            if !wifi.disconnect().await {
                return Err(ConnectError::DisconnectFailed);
            }
        }

        let existing = wifi
            .configured_networks()
            .await
            .into_iter()
            .find(|config| config.is_for(&request.ssid))
            .and_then(|config| config.network_id);
        let config =
            build_network_config(target, request.password.as_ref(), request.is_wep, existing);
        let network_id = wifi
            .add_or_update_network(&config)
            .await
            .ok_or(ConnectError::AddOrUpdateFailed)?;
        debug!(?network_id, key_management = ?config.key_management, "network configured");

        let events = wifi.subscribe().await;
        if !wifi.enable_network(network_id, true).await {
            return Err(ConnectError::ConnectNetworkFailed);
        }

        await_association(events, &request.ssid, self.config.connect_timeout()).await?;
        info!("connected");
        Ok(())
    }

    /// Fresh scan results, or the cached ones when the OS throttles the request
    async fn scan_for_connect(&self, wifi: &dyn WifiService) -> Result<Vec<WifiEntry>, ConnectError> {
        if wifi.start_scan().await {
            return Ok(wifi.scan_results().await);
        }

        let cached = wifi.scan_results().await;
        if cached.is_empty() {
            warn!("scan rejected and no cached results");
            return Err(ConnectError::CouldNotScan);
        }
        debug!(count = cached.len(), "scan rejected, using cached results");
        Ok(cached)
    }

    async fn ensure_radio_on(&self, wifi: &dyn WifiService) -> Result<(), ConnectError> {
        if wifi.is_wifi_enabled().await {
            return Ok(());
        }
        if self.system.sdk_version() >= ANDROID_Q_SDK {
            warn!("wifi is off and apps may not enable it on this version");
            return Err(ConnectError::CouldNotEnableWifi);
        }
        if !wifi.set_wifi_enabled(true).await {
            return Err(ConnectError::CouldNotEnableWifi);
        }
        Ok(())
    }

    pub(super) async fn current_ssid(&self) -> Result<String, CurrentSsidError> {
        if self.system.sdk_version() >= ANDROID_O_MR1_SDK && !self.system.has_location_permission()
        {
            return Err(CurrentSsidError::LocationPermissionMissing);
        }
        let wifi = self
            .system
            .wifi_service()
            .ok_or(CurrentSsidError::CouldNotGetWifiManager)?;

        let info = wifi
            .connection_info()
            .await
            .ok_or(CurrentSsidError::NotConnected)?;
        let ssid = unquote(&info.ssid);
        if ssid.is_empty() || ssid == UNKNOWN_SSID {
            return Err(CurrentSsidError::NotConnected);
        }
        Ok(ssid.to_string())
    }

    pub(super) async fn set_radio(&self, enabled: bool) -> Result<(), RadioError> {
        let wifi = self
            .system
            .wifi_service()
            .ok_or(RadioError::CouldNotGetWifiManager)?;

        if self.system.sdk_version() >= ANDROID_Q_SDK {
            warn!(enabled, "apps may not change the wifi state on this version");
            return Err(RadioError::CouldNotEnableWifi);
        }
        if !wifi.set_wifi_enabled(enabled).await {
            return Err(RadioError::CouldNotEnableWifi);
        }
        info!(enabled, "wifi state changed");
        Ok(())
    }

    pub(super) async fn drop_association(&self) -> Result<(), RadioError> {
        let wifi = self
            .system
            .wifi_service()
            .ok_or(RadioError::CouldNotGetWifiManager)?;
        if !wifi.disconnect().await {
            return Err(RadioError::DisconnectFailed);
        }
        Ok(())
    }

    pub(super) async fn radio_enabled(&self) -> bool {
        match self.system.wifi_service() {
            Some(wifi) => wifi.is_wifi_enabled().await,
            None => false,
        }
    }
}
