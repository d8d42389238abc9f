//! WiFi control for wifi-bridge
//!
//! This module provides the cross-platform facade, the backend trait it
//! delegates to, and the Android and iOS backends with their native service
//! boundaries.

pub mod android;
mod backend;
pub mod ios;
mod manager;
mod scanning;
mod types;

// Re-export public API
pub use backend::WifiBackend;
pub use manager::{PlatformServices, WifiManager};
pub use scanning::{strongest, wifi_list_to_json};
pub use types::{
    ConnectionEvent, ConnectionRequest, FailureReason, Operation, Platform, SecurityType,
    WifiEntry,
};
