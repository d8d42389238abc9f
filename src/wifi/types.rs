use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A nearby access point as reported by a scan
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiEntry {
    #[serde(rename = "SSID")]
    pub ssid: String,
    #[serde(rename = "BSSID")]
    pub bssid: String,
    pub capabilities: String,
    /// MHz
    pub frequency: u32,
    /// dBm
    pub level: i32,
    pub timestamp: u64,
}

impl WifiEntry {
    pub fn security(&self) -> SecurityType {
        SecurityType::from_capabilities(&self.capabilities)
    }
}

/// Security protocol family derived from a scan capabilities string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityType {
    Open,
    Wep,
    Wpa,
    Enterprise,
}

impl SecurityType {
    /// Parse Android style capabilities, e.g. `[WPA2-PSK-CCMP][RSN-SAE-CCMP][ESS]`
    pub fn from_capabilities(capabilities: &str) -> Self {
        let caps = capabilities.to_ascii_uppercase();
        // Enhanced Open is encrypted but takes no password
        if caps.contains("OWE") {
            SecurityType::Open
        } else if caps.contains("PSK") || caps.contains("SAE") {
            SecurityType::Wpa
        } else if caps.contains("EAP") {
            SecurityType::Enterprise
        } else if caps.contains("WEP") {
            SecurityType::Wep
        } else if caps.contains("WPA") || caps.contains("RSN") {
            SecurityType::Wpa
        } else {
            SecurityType::Open
        }
    }
}

/// Parameters of a single connect call
#[derive(Debug)]
pub struct ConnectionRequest {
    /// Exact SSID, or a prefix when `match_prefix` is set
    pub ssid: String,
    /// `None` joins an open network
    pub password: Option<SecretString>,
    pub is_wep: bool,
    pub match_prefix: bool,
}

impl ConnectionRequest {
    pub fn open(ssid: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: None,
            is_wep: false,
            match_prefix: false,
        }
    }

    pub fn protected(ssid: impl Into<String>, password: Option<SecretString>, is_wep: bool) -> Self {
        Self {
            ssid: ssid.into(),
            password,
            is_wep,
            match_prefix: false,
        }
    }

    pub fn prefix(mut self) -> Self {
        self.match_prefix = true;
        self
    }

    /// Whether `ssid` satisfies this request
    pub fn matches(&self, ssid: &str) -> bool {
        if self.match_prefix {
            ssid.starts_with(&self.ssid)
        } else {
            ssid == self.ssid
        }
    }
}

/// Why the OS gave up on an association attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureReason {
    Authentication,
    AssociationRejected,
    IpProvisioning,
    Unknown,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            FailureReason::Authentication => "Authentication Failure (Possible Wrong Password)",
            FailureReason::AssociationRejected => "Association Rejected",
            FailureReason::IpProvisioning => "IP Provisioning Failure",
            FailureReason::Unknown => "Unknown Failure",
        };
        f.write_str(reason)
    }
}

/// Connection events emitted by the native WiFi service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected(String),
    Disconnected(String),
    Failed { ssid: String, reason: FailureReason },
}

/// The mobile operating system a backend talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Android,
    Ios,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => f.write_str("android"),
            Platform::Ios => f.write_str("ios"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            other => Err(format!("unknown platform `{other}` (expected android or ios)")),
        }
    }
}

/// Every operation the facade exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ConnectToProtectedSsid,
    ConnectToSsid,
    ConnectToSsidPrefix,
    ConnectToProtectedSsidPrefix,
    DisconnectFromSsid,
    GetCurrentWifiSsid,
    LoadWifiList,
    ReScanAndLoadWifiList,
    IsEnabled,
    SetEnabled,
    ConnectionStatus,
    Disconnect,
    IsRemoveWifiNetwork,
    ForceWifiUsage,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ConnectToProtectedSsid => "connectToProtectedSSID",
            Operation::ConnectToSsid => "connectToSSID",
            Operation::ConnectToSsidPrefix => "connectToSSIDPrefix",
            Operation::ConnectToProtectedSsidPrefix => "connectToProtectedSSIDPrefix",
            Operation::DisconnectFromSsid => "disconnectFromSSID",
            Operation::GetCurrentWifiSsid => "getCurrentWifiSSID",
            Operation::LoadWifiList => "loadWifiList",
            Operation::ReScanAndLoadWifiList => "reScanAndLoadWifiList",
            Operation::IsEnabled => "isEnabled",
            Operation::SetEnabled => "setEnabled",
            Operation::ConnectionStatus => "connectionStatus",
            Operation::Disconnect => "disconnect",
            Operation::IsRemoveWifiNetwork => "isRemoveWifiNetwork",
            Operation::ForceWifiUsage => "forceWifiUsage",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_from_capabilities() {
        assert_eq!(
            SecurityType::from_capabilities("[WPA2-PSK-CCMP][ESS]"),
            SecurityType::Wpa
        );
        assert_eq!(
            SecurityType::from_capabilities("[RSN-SAE-CCMP][ESS]"),
            SecurityType::Wpa
        );
        assert_eq!(
            SecurityType::from_capabilities("[WPA2-EAP-CCMP][ESS]"),
            SecurityType::Enterprise
        );
        assert_eq!(SecurityType::from_capabilities("[WEP][ESS]"), SecurityType::Wep);
        assert_eq!(SecurityType::from_capabilities("[ESS]"), SecurityType::Open);
        assert_eq!(
            SecurityType::from_capabilities("[RSN-OWE-CCMP][ESS]"),
            SecurityType::Open
        );
        assert_eq!(SecurityType::from_capabilities(""), SecurityType::Open);
    }

    #[test]
    fn prefix_requests_match_by_prefix() {
        let request = ConnectionRequest::open("Cam-").prefix();
        assert!(request.matches("Cam-1234"));
        assert!(!request.matches("Home"));

        let exact = ConnectionRequest::open("Cam-");
        assert!(!exact.matches("Cam-1234"));
        assert!(exact.matches("Cam-"));
    }

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("iOS".parse::<Platform>(), Ok(Platform::Ios));
        assert_eq!("android".parse::<Platform>(), Ok(Platform::Android));
        assert!("windows".parse::<Platform>().is_err());
    }
}
