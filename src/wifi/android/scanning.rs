use tracing::{debug, warn};

use crate::error::ScanError;
use crate::wifi::android::{AndroidBackend, LocationDenied};
use crate::wifi::types::WifiEntry;

impl AndroidBackend {
    /// Return scan results, optionally requesting a fresh scan first
    pub(super) async fn scan(&self, rescan: bool) -> Result<Vec<WifiEntry>, ScanError> {
        self.check_location_access()
            .map_err(LocationDenied::into_scan_error)?;
        let wifi = self
            .system
            .wifi_service()
            .ok_or(ScanError::CouldNotGetWifiManager)?;

        if rescan && !wifi.start_scan().await {
            warn!("scan request rejected");
            return Err(ScanError::CouldNotScan);
        }

        let results = wifi.scan_results().await;
        debug!(count = results.len(), rescan, "scan results loaded");
        Ok(results)
    }
}
