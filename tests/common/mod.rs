#![allow(dead_code)]

use secrecy::SecretString;
use std::sync::Arc;
use wifi_bridge::sim::{SimNetwork, SimulatedAndroid, SimulatedHotspot};
use wifi_bridge::{BridgeConfig, PlatformServices, WifiManager};

pub const HOME_PASSWORD: &str = "correct horse";

pub fn password(value: &str) -> Option<SecretString> {
    Some(SecretString::from(value.to_string()))
}

/// A device with two access points for "Home", an open cafe and a WEP camera
pub fn neighbourhood(sdk_version: u32) -> SimulatedAndroid {
    SimulatedAndroid::new(sdk_version)
        .with_network(SimNetwork::wpa2("Home", "02:00:00:00:00:01", HOME_PASSWORD).with_level(-45))
        .with_network(SimNetwork::wpa2("Home", "02:00:00:00:00:02", HOME_PASSWORD).with_level(-78))
        .with_network(SimNetwork::open("Cafe", "02:00:00:00:00:03"))
        .with_network(
            SimNetwork::wpa2("Cam-01", "02:00:00:00:00:04", "abcde").with_capabilities("[WEP][ESS]"),
        )
}

pub fn android_manager(device: &SimulatedAndroid) -> WifiManager {
    WifiManager::for_platform(
        PlatformServices::Android(Arc::new(device.clone())),
        BridgeConfig::default(),
    )
}

pub fn ios_manager(device: SimulatedHotspot) -> (Arc<SimulatedHotspot>, WifiManager) {
    let device = Arc::new(device);
    let manager = WifiManager::for_platform(
        PlatformServices::Ios(device.clone()),
        BridgeConfig::default(),
    );
    (device, manager)
}
