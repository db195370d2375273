//! Serial port scanner
//!
//! On POSIX hosts ports are found by globbing well-known device node names.
//! On Windows the `serialport` crate enumerates devices through SetupAPI and
//! a failed enumeration is treated as no ports. An empty result is a normal
//! answer on every host.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serialport::SerialPortType;
use tracing::{debug, trace};

use crate::error::DetectError;
use crate::patterns;
use crate::port::SerialPort;

/// Anything that can produce the current set of candidate serial ports
///
/// Implemented by [`PortScanner`]; the device manager depends on this trait so
/// that scan results can be scripted.
pub trait PortSource: Send + Sync {
    /// Scan for serial ports, optionally restricted to USB adapters
    fn scan(&self, usb_only: bool) -> Result<BTreeSet<SerialPort>, DetectError>;
}

/// Serial port scanner configuration
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Directory the POSIX device patterns are resolved against
    pub device_root: PathBuf,
    /// Skip ports containing these substrings in USB-only scans
    pub skip_patterns: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            device_root: PathBuf::from("/"),
            skip_patterns: vec![patterns::BLUETOOTH_MARKER.to_string()],
        }
    }
}

/// Serial port scanner
#[derive(Debug, Clone, Default)]
pub struct PortScanner {
    config: ScannerConfig,
}

impl PortScanner {
    /// Create a new scanner with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with custom configuration
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Get the scanner configuration
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scan for serial ports
    ///
    /// With `usb_only` set, only USB adapters are reported and ports matching
    /// a skip pattern (Bluetooth by default) are dropped.
    pub fn scan(&self, usb_only: bool) -> Result<BTreeSet<SerialPort>, DetectError> {
        let ports = self.enumerate(usb_only)?;

        if ports.is_empty() {
            debug!("No serial ports found (usb_only={})", usb_only);
        } else {
            debug!("Found {} serial port(s) (usb_only={})", ports.len(), usb_only);
            for port in &ports {
                trace!("  {}", port);
            }
        }

        Ok(ports)
    }

    #[cfg(unix)]
    fn enumerate(&self, usb_only: bool) -> Result<BTreeSet<SerialPort>, DetectError> {
        let mut ports = self.glob_ports(patterns::for_scan(usb_only))?;
        if usb_only {
            ports.retain(|p| !self.should_skip_port(p.as_str()));
        }
        Ok(ports)
    }

    #[cfg(windows)]
    fn enumerate(&self, usb_only: bool) -> Result<BTreeSet<SerialPort>, DetectError> {
        // SetupAPI failures mean nothing usable is attached
        let ports = match serialport::available_ports() {
            Ok(ports) => ports,
            Err(e) => {
                debug!("Serial port enumeration failed: {}", e);
                return Ok(BTreeSet::new());
            }
        };

        Ok(ports
            .into_iter()
            .filter(|p| keep_port(&p.port_type, usb_only))
            .map(|p| SerialPort::new(p.port_name))
            .collect())
    }

    #[cfg(not(any(unix, windows)))]
    fn enumerate(&self, _usb_only: bool) -> Result<BTreeSet<SerialPort>, DetectError> {
        Err(DetectError::UnsupportedPlatform(std::env::consts::OS))
    }

    /// Expand device patterns under the configured root
    #[cfg(unix)]
    fn glob_ports(&self, device_patterns: &[&str]) -> Result<BTreeSet<SerialPort>, DetectError> {
        let root = self.config.device_root.to_string_lossy();
        let root = glob::Pattern::escape(root.trim_end_matches('/'));

        let mut ports = BTreeSet::new();
        for pattern in device_patterns {
            let full = format!("{}/{}", root, pattern);
            let paths = glob::glob(&full).map_err(|e| DetectError::Glob {
                pattern: full.clone(),
                reason: e.to_string(),
            })?;

            for entry in paths {
                match entry {
                    Ok(path) => {
                        ports.insert(SerialPort::new(path.to_string_lossy().into_owned()));
                    }
                    Err(e) => trace!("Skipping unreadable device entry: {}", e),
                }
            }
        }
        Ok(ports)
    }

    /// Check if a port should be skipped
    fn should_skip_port(&self, port: &str) -> bool {
        self.config
            .skip_patterns
            .iter()
            .any(|pattern| port.contains(pattern.as_str()))
    }
}

impl PortSource for PortScanner {
    fn scan(&self, usb_only: bool) -> Result<BTreeSet<SerialPort>, DetectError> {
        PortScanner::scan(self, usb_only)
    }
}

/// Windows port filter: keep everything, or only USB adapters
#[cfg_attr(not(windows), allow(dead_code))]
fn keep_port(port_type: &SerialPortType, usb_only: bool) -> bool {
    !usb_only || matches!(port_type, SerialPortType::UsbPort(_))
}
