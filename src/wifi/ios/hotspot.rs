//! Boundary to the iOS hotspot configuration service
//!
//! Stands in for `NEHotspotConfigurationManager` and the current network
//! query of the native side.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

/// A hotspot configuration to apply
#[derive(Debug)]
pub struct HotspotConfiguration {
    /// SSID, or SSID prefix when `match_prefix` is set
    pub ssid: String,
    pub match_prefix: bool,
    pub passphrase: Option<SecretString>,
    pub is_wep: bool,
    /// Forget the configuration when the app leaves the foreground
    pub join_once: bool,
}

/// `NEHotspotConfigurationError`
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotspotError {
    #[error("Invalid configuration")]
    Invalid,

    #[error("Invalid SSID")]
    InvalidSsid,

    #[error("Invalid WPA passphrase")]
    InvalidWpaPassphrase,

    #[error("Invalid WEP passphrase")]
    InvalidWepPassphrase,

    #[error("Invalid EAP settings")]
    InvalidEapSettings,

    #[error("Invalid SSID prefix")]
    InvalidSsidPrefix,

    #[error("User denied the join request")]
    UserDenied,

    #[error("Internal error")]
    Internal,

    #[error("A join request is already pending")]
    Pending,

    #[error("System configuration error")]
    SystemConfiguration,

    #[error("Join once is not supported")]
    JoinOnceNotSupported,

    #[error("Already associated")]
    AlreadyAssociated,

    #[error("Application is not in the foreground")]
    ApplicationIsNotInForeground,

    #[error("Unknown error")]
    Unknown,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HotspotService: Send + Sync {
    /// Major iOS version, e.g. `17`
    fn os_major_version(&self) -> u32;

    async fn apply_configuration(
        &self,
        configuration: HotspotConfiguration,
    ) -> Result<(), HotspotError>;

    /// Remove the configuration for an SSID or SSID prefix
    async fn remove_configuration(&self, ssid: &str);

    /// SSID of the network the device is associated with
    async fn current_ssid(&self) -> Option<String>;
}
