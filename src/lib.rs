//! wifi-bridge
//!
//! A cross-platform WiFi control facade. Application code calls one async API;
//! the facade routes each call to an Android or iOS backend that talks to the
//! native OS services through the traits in [`wifi::android::native`] and
//! [`wifi::ios::hotspot`].

pub mod config;
pub mod error;
pub mod sim;
pub mod wifi;

pub use config::BridgeConfig;
pub use error::{
    ConnectError, CurrentSsidError, ErrorTag, ForceWifiUsageError, RadioError,
    RemoveNetworkError, ScanError, Unsupported,
};
pub use wifi::{Operation, Platform, PlatformServices, WifiEntry, WifiManager};
