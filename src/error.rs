/// Typed errors for wifi-bridge operations
///
/// Every operation family resolves to one closed enum so callers can branch on
/// the failure instead of parsing messages. Each variant has a stable camelCase
/// tag, which is also what the error serializes to.
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::wifi::{Operation, Platform};

/// A stable, machine-readable name for an error variant
pub trait ErrorTag {
    fn tag(&self) -> &'static str;
}

macro_rules! serialize_as_tag {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.tag())
                }
            }
        )+
    };
}

/// An operation was invoked on a platform that cannot perform it
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{operation} is not supported on {platform}")]
pub struct Unsupported {
    pub operation: Operation,
    pub platform: Platform,
}

impl Unsupported {
    pub fn new(operation: Operation, platform: Platform) -> Self {
        Self {
            operation,
            platform,
        }
    }
}

impl ErrorTag for Unsupported {
    fn tag(&self) -> &'static str {
        "unsupported"
    }
}

/// Errors from the connect family of operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Location permission has not been granted")]
    LocationPermissionMissing,

    #[error("Location services are turned off")]
    LocationServicesOff,

    #[error("WiFi is off and could not be enabled")]
    CouldNotEnableWifi,

    #[error("Could not scan for networks")]
    CouldNotScan,

    #[error("Network found by scanning uses a security type that cannot be configured")]
    DidNotFindNetworkByScanning,

    #[error("Authentication failed (wrong password or conflicting saved network)")]
    AuthenticationErrorOccurred,

    #[error("Connection did not complete in time")]
    TimeoutOccurred,

    #[error("Could not connect")]
    CouldNotConnect,

    #[error("Network is not in range")]
    NotInRange,

    #[error("Could not add or update the network configuration")]
    AddOrUpdateFailed,

    #[error("Could not disconnect from the current network")]
    DisconnectFailed,

    #[error("Could not start connecting to the network")]
    ConnectNetworkFailed,

    #[error(transparent)]
    Unsupported(#[from] Unsupported),
}

impl ErrorTag for ConnectError {
    fn tag(&self) -> &'static str {
        match self {
            ConnectError::LocationPermissionMissing => "locationPermissionMissing",
            ConnectError::LocationServicesOff => "locationServicesOff",
            ConnectError::CouldNotEnableWifi => "couldNotEnableWifi",
            ConnectError::CouldNotScan => "couldNotScan",
            ConnectError::DidNotFindNetworkByScanning => "didNotFindNetworkByScanning",
            ConnectError::AuthenticationErrorOccurred => "authenticationErrorOccurred",
            ConnectError::TimeoutOccurred => "timeoutOccurred",
            ConnectError::CouldNotConnect => "couldNotConnect",
            ConnectError::NotInRange => "notInRange",
            ConnectError::AddOrUpdateFailed => "addOrUpdateFailed",
            ConnectError::DisconnectFailed => "disconnectFailed",
            ConnectError::ConnectNetworkFailed => "connectNetworkFailed",
            ConnectError::Unsupported(e) => e.tag(),
        }
    }
}

/// Errors from listing nearby networks
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    #[error("Location permission has not been granted")]
    LocationPermissionMissing,

    #[error("Location services are turned off")]
    LocationServicesOff,

    #[error("Could not get the WiFi manager")]
    CouldNotGetWifiManager,

    #[error("Scan request was rejected (possibly throttled)")]
    CouldNotScan,

    #[error(transparent)]
    Unsupported(#[from] Unsupported),
}

impl ErrorTag for ScanError {
    fn tag(&self) -> &'static str {
        match self {
            ScanError::LocationPermissionMissing => "locationPermissionMissing",
            ScanError::LocationServicesOff => "locationServicesOff",
            ScanError::CouldNotGetWifiManager => "couldNotGetWifiManager",
            ScanError::CouldNotScan => "couldNotScan",
            ScanError::Unsupported(e) => e.tag(),
        }
    }
}

/// Errors from reading the SSID of the current network
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentSsidError {
    #[error("Location permission has not been granted")]
    LocationPermissionMissing,

    #[error("Could not get the WiFi manager")]
    CouldNotGetWifiManager,

    #[error("Not connected to a WiFi network")]
    NotConnected,

    #[error(transparent)]
    Unsupported(#[from] Unsupported),
}

impl ErrorTag for CurrentSsidError {
    fn tag(&self) -> &'static str {
        match self {
            CurrentSsidError::LocationPermissionMissing => "locationPermissionMissing",
            CurrentSsidError::CouldNotGetWifiManager => "couldNotGetWifiManager",
            CurrentSsidError::NotConnected => "notConnected",
            CurrentSsidError::Unsupported(e) => e.tag(),
        }
    }
}

/// Errors from radio power and association control
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    #[error("Could not get the WiFi manager")]
    CouldNotGetWifiManager,

    #[error("WiFi state could not be changed")]
    CouldNotEnableWifi,

    #[error("Could not disconnect from the current network")]
    DisconnectFailed,

    #[error(transparent)]
    Unsupported(#[from] Unsupported),
}

impl ErrorTag for RadioError {
    fn tag(&self) -> &'static str {
        match self {
            RadioError::CouldNotGetWifiManager => "couldNotGetWifiManager",
            RadioError::CouldNotEnableWifi => "couldNotEnableWifi",
            RadioError::DisconnectFailed => "disconnectFailed",
            RadioError::Unsupported(e) => e.tag(),
        }
    }
}

/// Errors from removing a saved network configuration
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveNetworkError {
    #[error("Could not get the WiFi manager")]
    CouldNotGetWifiManager,

    #[error("Could not get the connectivity manager")]
    CouldNotGetConnectivityManager,

    #[error(transparent)]
    Unsupported(#[from] Unsupported),
}

impl ErrorTag for RemoveNetworkError {
    fn tag(&self) -> &'static str {
        match self {
            RemoveNetworkError::CouldNotGetWifiManager => "couldNotGetWifiManager",
            RemoveNetworkError::CouldNotGetConnectivityManager => "couldNotGetConnectivityManager",
            RemoveNetworkError::Unsupported(e) => e.tag(),
        }
    }
}

/// Errors from binding app traffic to the WiFi interface
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceWifiUsageError {
    #[error("Could not get the connectivity manager")]
    CouldNotGetConnectivityManager,

    #[error(transparent)]
    Unsupported(#[from] Unsupported),
}

impl ErrorTag for ForceWifiUsageError {
    fn tag(&self) -> &'static str {
        match self {
            ForceWifiUsageError::CouldNotGetConnectivityManager => "couldNotGetConnectivityManager",
            ForceWifiUsageError::Unsupported(e) => e.tag(),
        }
    }
}

serialize_as_tag!(
    Unsupported,
    ConnectError,
    ScanError,
    CurrentSsidError,
    RadioError,
    RemoveNetworkError,
    ForceWifiUsageError,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_is_tagged_the_same_in_every_family() {
        let unsupported = Unsupported::new(Operation::LoadWifiList, Platform::Ios);
        assert_eq!(ConnectError::from(unsupported).tag(), "unsupported");
        assert_eq!(ScanError::from(unsupported).tag(), "unsupported");
        assert_eq!(ForceWifiUsageError::from(unsupported).tag(), "unsupported");
    }

    #[test]
    fn unsupported_message_names_operation_and_platform() {
        let unsupported = Unsupported::new(Operation::ConnectToSsidPrefix, Platform::Android);
        assert_eq!(
            unsupported.to_string(),
            "connectToSSIDPrefix is not supported on android"
        );
    }

    #[test]
    fn errors_serialize_as_their_tag() {
        let json = serde_json::to_string(&ConnectError::NotInRange).unwrap();
        assert_eq!(json, "\"notInRange\"");

        let json =
            serde_json::to_string(&RemoveNetworkError::CouldNotGetConnectivityManager).unwrap();
        assert_eq!(json, "\"couldNotGetConnectivityManager\"");
    }
}
