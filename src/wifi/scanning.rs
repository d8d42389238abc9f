use crate::wifi::types::WifiEntry;

/// Strongest access point broadcasting `ssid`
pub fn strongest<'a>(entries: &'a [WifiEntry], ssid: &str) -> Option<&'a WifiEntry> {
    entries
        .iter()
        .filter(|entry| entry.ssid == ssid)
        .max_by_key(|entry| entry.level)
}

/// Serialize scan results as a JSON array, the format handed to callback consumers
pub fn wifi_list_to_json(entries: &[WifiEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ssid: &str, bssid: &str, level: i32) -> WifiEntry {
        WifiEntry {
            ssid: ssid.to_string(),
            bssid: bssid.to_string(),
            capabilities: "[WPA2-PSK-CCMP][ESS]".to_string(),
            frequency: 5180,
            level,
            timestamp: 42,
        }
    }

    #[test]
    fn picks_strongest_bssid() {
        let entries = vec![
            entry("Home", "aa:aa:aa:aa:aa:01", -70),
            entry("Home", "aa:aa:aa:aa:aa:02", -40),
            entry("Cafe", "aa:aa:aa:aa:aa:03", -20),
        ];
        let best = strongest(&entries, "Home").unwrap();
        assert_eq!(best.bssid, "aa:aa:aa:aa:aa:02");
        assert!(strongest(&entries, "Office").is_none());
    }

    #[test]
    fn json_uses_wire_field_names() {
        let json = wifi_list_to_json(&[entry("Home", "aa:aa:aa:aa:aa:01", -70)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let record = value[0].as_object().unwrap();
        for key in ["SSID", "BSSID", "capabilities", "frequency", "level", "timestamp"] {
            assert!(record.contains_key(key), "missing {key}");
        }
        assert_eq!(record.len(), 6);
        assert_eq!(record["level"], -70);
    }
}
