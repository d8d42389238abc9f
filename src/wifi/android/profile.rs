use secrecy::{ExposeSecret, SecretString};

use crate::wifi::types::{SecurityType, WifiEntry};

/// Identifier the OS assigns to a saved network configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(pub i32);

/// Key management scheme of a saved network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyManagement {
    None,
    Wep,
    WpaPsk,
}

/// A saved network configuration, in the form the OS stores it
#[derive(Debug)]
pub struct NetworkConfig {
    pub network_id: Option<NetworkId>,
    /// Quoted SSID, e.g. `"Home"`
    pub ssid: String,
    pub bssid: Option<String>,
    pub key_management: KeyManagement,
    /// Quoted passphrase for WPA networks
    pub pre_shared_key: Option<SecretString>,
    /// WEP key 0, quoted unless it is a hex key
    pub wep_key: Option<SecretString>,
    pub hidden: bool,
}

impl NetworkConfig {
    /// Whether this configuration belongs to the given unquoted SSID
    pub fn is_for(&self, ssid: &str) -> bool {
        unquote(&self.ssid) == ssid
    }
}

/// Wrap an SSID or passphrase in double quotes the way the OS expects
pub fn quote(value: &str) -> String {
    format!("\"{value}\"")
}

/// Strip the surrounding double quotes the OS puts around SSIDs
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// WEP keys of 10, 26 or 58 hex digits are passed raw, anything else is ASCII
fn is_hex_wep_key(key: &str) -> bool {
    matches!(key.len(), 10 | 26 | 58) && key.chars().all(|c| c.is_ascii_hexdigit())
}

/// Build the configuration for joining `entry`
///
/// A missing password always yields an open configuration, and so does a
/// network that scans as open unless `is_wep` is set. `is_wep` forces the WEP
/// path even when the capabilities string does not advertise it.
pub fn build_network_config(
    entry: &WifiEntry,
    password: Option<&SecretString>,
    is_wep: bool,
    existing: Option<NetworkId>,
) -> NetworkConfig {
    let mut config = NetworkConfig {
        network_id: existing,
        ssid: quote(&entry.ssid),
        bssid: Some(entry.bssid.clone()),
        key_management: KeyManagement::None,
        pre_shared_key: None,
        wep_key: None,
        hidden: false,
    };

    let security = entry.security();
    let Some(password) = password else {
        return config;
    };
    if security == SecurityType::Open && !is_wep {
        return config;
    }
    let password = password.expose_secret();

    if is_wep || security == SecurityType::Wep {
        let key = if is_hex_wep_key(password) {
            password.to_string()
        } else {
            quote(password)
        };
        config.key_management = KeyManagement::Wep;
        config.wep_key = Some(SecretString::from(key));
    } else {
        config.key_management = KeyManagement::WpaPsk;
        config.pre_shared_key = Some(SecretString::from(quote(password)));
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(capabilities: &str) -> WifiEntry {
        WifiEntry {
            ssid: "Home".to_string(),
            bssid: "aa:bb:cc:dd:ee:ff".to_string(),
            capabilities: capabilities.to_string(),
            frequency: 2437,
            level: -50,
            timestamp: 0,
        }
    }

    #[test]
    fn open_config_without_password() {
        let config = build_network_config(&entry("[WPA2-PSK-CCMP]"), None, false, None);
        assert_eq!(config.key_management, KeyManagement::None);
        assert_eq!(config.ssid, "\"Home\"");
        assert!(config.pre_shared_key.is_none());
    }

    #[test]
    fn open_network_ignores_password() {
        for given in ["anything1", ""] {
            let password = SecretString::from(given.to_string());
            let config = build_network_config(&entry("[ESS]"), Some(&password), false, None);
            assert_eq!(config.key_management, KeyManagement::None);
            assert!(config.pre_shared_key.is_none());
            assert!(config.wep_key.is_none());
        }
    }

    #[test]
    fn wpa_passphrase_is_quoted() {
        let password = SecretString::from("hunter22".to_string());
        let config =
            build_network_config(&entry("[WPA2-PSK-CCMP]"), Some(&password), false, None);
        assert_eq!(config.key_management, KeyManagement::WpaPsk);
        let psk = config.pre_shared_key.unwrap();
        assert_eq!(psk.expose_secret(), "\"hunter22\"");
    }

    #[test]
    fn wep_hex_key_is_raw_and_ascii_key_is_quoted() {
        let hex = SecretString::from("0123456789".to_string());
        let config = build_network_config(&entry("[ESS]"), Some(&hex), true, None);
        assert_eq!(config.key_management, KeyManagement::Wep);
        assert_eq!(config.wep_key.unwrap().expose_secret(), "0123456789");

        let ascii = SecretString::from("abcde".to_string());
        let config = build_network_config(&entry("[WEP]"), Some(&ascii), false, None);
        assert_eq!(config.wep_key.unwrap().expose_secret(), "\"abcde\"");
    }

    #[test]
    fn existing_id_is_kept_for_updates() {
        let config = build_network_config(&entry("[ESS]"), None, false, Some(NetworkId(7)));
        assert_eq!(config.network_id, Some(NetworkId(7)));
    }

    #[test]
    fn unquote_only_strips_matching_quotes() {
        assert_eq!(unquote("\"Home\""), "Home");
        assert_eq!(unquote("Home"), "Home");
        assert_eq!(unquote("\"Home"), "\"Home");
    }
}
