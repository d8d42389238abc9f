//! iOS backend
//!
//! iOS cannot scan or manage saved networks; it joins by applying a hotspot
//! configuration for an exact SSID or an SSID prefix. Every Android-only
//! operation is rejected as unsupported.

pub mod hotspot;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::{BridgeConfig, IOS_PREFIX_JOIN_MIN_VERSION};
use crate::error::{
    ConnectError, CurrentSsidError, ForceWifiUsageError, RadioError, RemoveNetworkError,
    ScanError, Unsupported,
};
use crate::wifi::backend::WifiBackend;
use crate::wifi::types::{ConnectionRequest, Operation, Platform, WifiEntry};
use hotspot::{HotspotConfiguration, HotspotError, HotspotService};

pub struct IosBackend {
    hotspot: Arc<dyn HotspotService>,
    config: BridgeConfig,
}

impl IosBackend {
    pub fn new(hotspot: Arc<dyn HotspotService>, config: BridgeConfig) -> Self {
        Self { hotspot, config }
    }

    fn unsupported(&self, operation: Operation) -> Unsupported {
        Unsupported::new(operation, Platform::Ios)
    }

    /// Apply a hotspot configuration, then confirm the device joined a matching network
    #[instrument(skip_all, fields(ssid = %request.ssid, prefix = request.match_prefix))]
    async fn join(
        &self,
        operation: Operation,
        request: &ConnectionRequest,
    ) -> Result<(), ConnectError> {
        if !self.supports(operation) {
            return Err(self.unsupported(operation).into());
        }

        let configuration = HotspotConfiguration {
            ssid: request.ssid.clone(),
            match_prefix: request.match_prefix,
            passphrase: request
                .password
                .as_ref()
                .map(|password| SecretString::from(password.expose_secret().to_string())),
            is_wep: request.is_wep,
            join_once: self.config.join_once,
        };

        match self.hotspot.apply_configuration(configuration).await {
            Ok(()) => {}
            Err(HotspotError::AlreadyAssociated) => debug!("already associated"),
            Err(err) => {
                warn!(%err, "hotspot configuration rejected");
                return Err(hotspot_error_to_connect_error(err));
            }
        }

        match self.hotspot.current_ssid().await {
            Some(current) if request.matches(&current) => {
                info!(%current, "connected");
                Ok(())
            }
            Some(current) => {
                warn!(%current, "joined a different network");
                Err(ConnectError::CouldNotConnect)
            }
            None => {
                warn!("no network joined after applying configuration");
                Err(ConnectError::NotInRange)
            }
        }
    }
}

fn hotspot_error_to_connect_error(err: HotspotError) -> ConnectError {
    match err {
        HotspotError::InvalidWpaPassphrase | HotspotError::InvalidWepPassphrase => {
            ConnectError::AuthenticationErrorOccurred
        }
        _ => ConnectError::CouldNotConnect,
    }
}

#[async_trait]
impl WifiBackend for IosBackend {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::ConnectToProtectedSsid
            | Operation::ConnectToSsid
            | Operation::DisconnectFromSsid
            | Operation::GetCurrentWifiSsid => true,
            Operation::ConnectToSsidPrefix | Operation::ConnectToProtectedSsidPrefix => {
                self.hotspot.os_major_version() >= IOS_PREFIX_JOIN_MIN_VERSION
            }
            _ => false,
        }
    }

    async fn connect_to_protected_ssid(
        &self,
        request: &ConnectionRequest,
    ) -> Result<(), ConnectError> {
        self.join(Operation::ConnectToProtectedSsid, request).await
    }

    async fn connect_to_ssid(&self, ssid: &str) -> Result<(), ConnectError> {
        self.join(Operation::ConnectToSsid, &ConnectionRequest::open(ssid))
            .await
    }

    async fn connect_to_ssid_prefix(&self, prefix: &str) -> Result<(), ConnectError> {
        let request = ConnectionRequest::open(prefix).prefix();
        self.join(Operation::ConnectToSsidPrefix, &request).await
    }

    async fn connect_to_protected_ssid_prefix(
        &self,
        request: &ConnectionRequest,
    ) -> Result<(), ConnectError> {
        self.join(Operation::ConnectToProtectedSsidPrefix, request)
            .await
    }

    async fn disconnect_from_ssid(&self, prefix: &str) -> Result<(), Unsupported> {
        self.hotspot.remove_configuration(prefix).await;
        info!(%prefix, "hotspot configuration removed");
        Ok(())
    }

    async fn get_current_wifi_ssid(&self) -> Result<String, CurrentSsidError> {
        self.hotspot
            .current_ssid()
            .await
            .ok_or(CurrentSsidError::NotConnected)
    }

    async fn load_wifi_list(&self) -> Result<Vec<WifiEntry>, ScanError> {
        Err(self.unsupported(Operation::LoadWifiList).into())
    }

    async fn re_scan_and_load_wifi_list(&self) -> Result<Vec<WifiEntry>, ScanError> {
        Err(self.unsupported(Operation::ReScanAndLoadWifiList).into())
    }

    async fn is_enabled(&self) -> Result<bool, Unsupported> {
        Err(self.unsupported(Operation::IsEnabled))
    }

    async fn set_enabled(&self, _enabled: bool) -> Result<(), RadioError> {
        Err(self.unsupported(Operation::SetEnabled).into())
    }

    async fn connection_status(&self) -> Result<bool, Unsupported> {
        Err(self.unsupported(Operation::ConnectionStatus))
    }

    async fn disconnect(&self) -> Result<(), RadioError> {
        Err(self.unsupported(Operation::Disconnect).into())
    }

    async fn is_remove_wifi_network(&self, _ssid: &str) -> Result<bool, RemoveNetworkError> {
        Err(self.unsupported(Operation::IsRemoveWifiNetwork).into())
    }

    async fn force_wifi_usage(&self, _use_wifi: bool) -> Result<(), ForceWifiUsageError> {
        Err(self.unsupported(Operation::ForceWifiUsage).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotspot::MockHotspotService;
    use mockall::predicate::eq;

    fn backend(mock: MockHotspotService) -> IosBackend {
        IosBackend::new(Arc::new(mock), BridgeConfig::default())
    }

    #[tokio::test]
    async fn passes_passphrase_and_wep_flag_to_the_hotspot_service() {
        let mut mock = MockHotspotService::new();
        mock.expect_os_major_version().return_const(17u32);
        mock.expect_apply_configuration()
            .withf(|config| {
                config.ssid == "Cam-"
                    && config.match_prefix
                    && config.is_wep
                    && config
                        .passphrase
                        .as_ref()
                        .is_some_and(|p| p.expose_secret() == "abcde")
            })
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_current_ssid()
            .returning(|| Some("Cam-0042".to_string()));

        let request = ConnectionRequest::protected(
            "Cam-",
            Some(SecretString::from("abcde".to_string())),
            true,
        )
        .prefix();
        let result = backend(mock)
            .connect_to_protected_ssid_prefix(&request)
            .await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn prefix_join_needs_ios_13() {
        let mut mock = MockHotspotService::new();
        mock.expect_os_major_version().return_const(12u32);
        mock.expect_apply_configuration().never();

        let err = backend(mock)
            .connect_to_ssid_prefix("Cam-")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ConnectError::Unsupported(Unsupported::new(
                Operation::ConnectToSsidPrefix,
                Platform::Ios
            ))
        );
    }

    #[tokio::test]
    async fn already_associated_counts_as_success() {
        let mut mock = MockHotspotService::new();
        mock.expect_os_major_version().return_const(17u32);
        mock.expect_apply_configuration()
            .returning(|_| Err(HotspotError::AlreadyAssociated));
        mock.expect_current_ssid()
            .returning(|| Some("Home".to_string()));

        assert_eq!(backend(mock).connect_to_ssid("Home").await, Ok(()));
    }

    #[tokio::test]
    async fn hotspot_errors_map_to_connect_errors() {
        let mut mock = MockHotspotService::new();
        mock.expect_os_major_version().return_const(17u32);
        mock.expect_apply_configuration()
            .returning(|_| Err(HotspotError::UserDenied));
        mock.expect_current_ssid().never();

        assert_eq!(
            backend(mock).connect_to_ssid("Home").await,
            Err(ConnectError::CouldNotConnect)
        );
        assert_eq!(
            hotspot_error_to_connect_error(HotspotError::InvalidWpaPassphrase),
            ConnectError::AuthenticationErrorOccurred
        );
    }

    #[tokio::test]
    async fn joining_a_different_network_fails() {
        let mut mock = MockHotspotService::new();
        mock.expect_os_major_version().return_const(17u32);
        mock.expect_apply_configuration().returning(|_| Ok(()));
        mock.expect_current_ssid()
            .returning(|| Some("Neighbour".to_string()));

        assert_eq!(
            backend(mock).connect_to_ssid("Home").await,
            Err(ConnectError::CouldNotConnect)
        );
    }

    #[tokio::test]
    async fn disconnect_removes_configuration_for_prefix() {
        let mut mock = MockHotspotService::new();
        mock.expect_remove_configuration()
            .with(eq("Cam-"))
            .times(1)
            .returning(|_| ());

        assert_eq!(backend(mock).disconnect_from_ssid("Cam-").await, Ok(()));
    }
}
