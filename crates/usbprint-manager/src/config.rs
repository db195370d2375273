//! Manager configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How attached ports map to managed devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceMode {
    /// Any attached port means one printer, which finds its own port
    #[default]
    Autodetect,
    /// One managed device per attached port
    PerPort,
}

impl DeviceMode {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Autodetect => "Autodetect",
            Self::PerPort => "Per Port",
        }
    }

    /// Get description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Autodetect => "Treat any attached USB serial device as a single printer",
            Self::PerPort => "Create a separate printer for every attached serial port",
        }
    }
}

/// Device manager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Delay between port scans (ms)
    pub scan_interval_ms: u64,
    /// Only consider USB serial adapters
    pub usb_only: bool,
    /// Port to device mapping
    pub device_mode: DeviceMode,
    /// Capacity of the watcher to manager request channel
    pub request_queue: usize,
}

impl ManagerConfig {
    /// Get the scan interval
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            scan_interval_ms: 5000,
            usb_only: true,
            device_mode: DeviceMode::Autodetect,
            request_queue: 64,
        }
    }
}
