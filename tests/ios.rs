use wifi_bridge::sim::{AssociationBehavior, SimNetwork, SimulatedHotspot};
use wifi_bridge::wifi::FailureReason;
use wifi_bridge::{
    ConnectError, CurrentSsidError, ErrorTag, ForceWifiUsageError, Operation, Platform,
    RadioError, RemoveNetworkError, ScanError, Unsupported,
};

mod common;
use common::{HOME_PASSWORD, ios_manager, password};

fn phone(os_version: u32) -> SimulatedHotspot {
    SimulatedHotspot::new(os_version)
        .with_network(SimNetwork::wpa2("Home", "02:00:00:00:00:01", HOME_PASSWORD).with_level(-45))
        .with_network(SimNetwork::open("Cam-4F2A", "02:00:00:00:00:04").with_level(-50))
        .with_network(SimNetwork::open("Cam-77B0", "02:00:00:00:00:05").with_level(-70))
        .with_network(SimNetwork::open("Printer", "02:00:00:00:00:06").with_behavior(
            AssociationBehavior::Fail(FailureReason::AssociationRejected),
        ))
}

#[tokio::test]
async fn joins_protected_network() {
    let (device, manager) = ios_manager(phone(17));
    assert_eq!(manager.platform(), Platform::Ios);

    manager
        .connect_to_protected_ssid("Home", password(HOME_PASSWORD), false)
        .await
        .unwrap();

    assert_eq!(device.current().as_deref(), Some("Home"));
    assert_eq!(manager.get_current_wifi_ssid().await, Ok("Home".to_string()));
    assert_eq!(device.configurations(), vec!["Home".to_string()]);
}

#[tokio::test]
async fn joining_the_current_network_again_succeeds() {
    let (_, manager) = ios_manager(phone(17));

    manager.connect_to_ssid("Cam-4F2A").await.unwrap();
    assert_eq!(manager.connect_to_ssid("Cam-4F2A").await, Ok(()));
}

#[tokio::test]
async fn prefix_join_picks_a_matching_network() {
    let (device, manager) = ios_manager(phone(17));

    manager.connect_to_ssid_prefix("Cam-").await.unwrap();

    let current = device.current().unwrap();
    assert!(current.starts_with("Cam-"));
    assert_eq!(device.configurations(), vec!["Cam-".to_string()]);
}

#[tokio::test]
async fn protected_prefix_join() {
    let (device, manager) = ios_manager(phone(17));

    manager
        .connect_to_protected_ssid_prefix("Ho", password(HOME_PASSWORD), false)
        .await
        .unwrap();
    assert_eq!(device.current().as_deref(), Some("Home"));
}

#[tokio::test]
async fn prefix_join_needs_ios_13() {
    let (device, manager) = ios_manager(phone(12));

    assert_eq!(
        manager.connect_to_ssid_prefix("Cam-").await,
        Err(ConnectError::Unsupported(Unsupported::new(
            Operation::ConnectToSsidPrefix,
            Platform::Ios
        )))
    );
    assert!(device.configurations().is_empty());

    // exact joins still work
    manager.connect_to_ssid("Cam-4F2A").await.unwrap();
}

#[tokio::test]
async fn wrong_passphrase_is_an_authentication_error() {
    let (device, manager) = ios_manager(phone(17));

    let err = manager
        .connect_to_protected_ssid("Home", password("battery staple"), false)
        .await
        .unwrap_err();
    assert_eq!(err, ConnectError::AuthenticationErrorOccurred);
    assert_eq!(err.tag(), "authenticationErrorOccurred");

    // too short for WPA at all
    assert_eq!(
        manager
            .connect_to_protected_ssid("Home", password("short"), false)
            .await,
        Err(ConnectError::AuthenticationErrorOccurred)
    );
    assert_eq!(device.current(), None);
}

#[tokio::test]
async fn missing_network_is_not_in_range() {
    let (_, manager) = ios_manager(phone(17));

    assert_eq!(
        manager.connect_to_ssid("Nowhere").await,
        Err(ConnectError::NotInRange)
    );
}

#[tokio::test]
async fn joining_elsewhere_is_a_connect_failure() {
    let (_, manager) = ios_manager(phone(17));
    manager.connect_to_ssid("Cam-4F2A").await.unwrap();

    // nothing named "Nowhere" answers, so the phone stays on the camera
    assert_eq!(
        manager.connect_to_ssid("Nowhere").await,
        Err(ConnectError::CouldNotConnect)
    );
}

#[tokio::test]
async fn hotspot_failures_are_connect_failures() {
    let (device, manager) = ios_manager(phone(17));

    assert_eq!(
        manager.connect_to_ssid("Printer").await,
        Err(ConnectError::CouldNotConnect)
    );

    device.set_user_denies(true);
    assert_eq!(
        manager.connect_to_ssid("Cam-4F2A").await,
        Err(ConnectError::CouldNotConnect)
    );
    assert_eq!(device.current(), None);
}

#[tokio::test]
async fn disconnect_from_ssid_removes_the_configuration() {
    let (device, manager) = ios_manager(phone(17));
    manager.connect_to_ssid_prefix("Cam-").await.unwrap();

    manager.disconnect_from_ssid("Cam-").await.unwrap();

    assert!(device.configurations().is_empty());
    assert_eq!(device.current(), None);
    assert_eq!(
        manager.get_current_wifi_ssid().await,
        Err(CurrentSsidError::NotConnected)
    );
}

#[tokio::test]
async fn android_only_operations_are_rejected() {
    let (_, manager) = ios_manager(phone(17));
    let unsupported = |operation| Unsupported::new(operation, Platform::Ios);

    assert_eq!(
        manager.load_wifi_list().await,
        Err(ScanError::Unsupported(unsupported(Operation::LoadWifiList)))
    );
    assert_eq!(
        manager.re_scan_and_load_wifi_list().await,
        Err(ScanError::Unsupported(unsupported(
            Operation::ReScanAndLoadWifiList
        )))
    );
    assert_eq!(
        manager.is_enabled().await,
        Err(unsupported(Operation::IsEnabled))
    );
    assert_eq!(
        manager.set_enabled(true).await,
        Err(RadioError::Unsupported(unsupported(Operation::SetEnabled)))
    );
    assert_eq!(
        manager.connection_status().await,
        Err(unsupported(Operation::ConnectionStatus))
    );
    assert_eq!(
        manager.disconnect().await,
        Err(RadioError::Unsupported(unsupported(Operation::Disconnect)))
    );
    assert_eq!(
        manager.is_remove_wifi_network("Home").await,
        Err(RemoveNetworkError::Unsupported(unsupported(
            Operation::IsRemoveWifiNetwork
        )))
    );
    assert_eq!(
        manager.force_wifi_usage(true).await,
        Err(ForceWifiUsageError::Unsupported(unsupported(
            Operation::ForceWifiUsage
        )))
    );
}
