//! Managed device contract
//!
//! The manager creates devices but does not implement them; the serial
//! protocol to the printer firmware lives behind [`ManagedDevice`].

use std::fmt;
use std::path::Path;
use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};
use usbprint_detect::SerialPort;

use crate::error::DeviceError;

/// Registry key of a managed device
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceKey {
    /// Sentinel for a device that picks its own port
    Autodetect,
    /// Device bound to one concrete port
    Port(SerialPort),
}

impl DeviceKey {
    /// Get the bound port, if this key names one
    pub fn port(&self) -> Option<&SerialPort> {
        match self {
            Self::Autodetect => None,
            Self::Port(port) => Some(port),
        }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Autodetect => f.write_str("autodetect"),
            Self::Port(port) => write!(f, "{}", port),
        }
    }
}

/// Connection state of a managed device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    #[default]
    Closed,
    Connecting,
    Connected,
    Busy,
    Error,
}

/// Notification from a managed device
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// Connection state changed
    ConnectionStateChanged {
        key: DeviceKey,
        state: ConnectionState,
    },
    /// Operation progress changed (0-100)
    ProgressChanged { key: DeviceKey, progress: f64 },
    /// Firmware update started, finished or was reset
    FirmwareUpdateChanged { key: DeviceKey, finished: bool },
}

impl DeviceEvent {
    /// Get the key of the device that sent this event
    pub fn key(&self) -> &DeviceKey {
        match self {
            Self::ConnectionStateChanged { key, .. }
            | Self::ProgressChanged { key, .. }
            | Self::FirmwareUpdateChanged { key, .. } => key,
        }
    }
}

/// Channel a device uses to notify the manager
///
/// Handed to the device at creation and bound to its registry key. Sends
/// never block and are dropped silently once the manager is gone.
#[derive(Debug, Clone)]
pub struct DeviceNotifier {
    key: DeviceKey,
    tx: Sender<DeviceEvent>,
}

impl DeviceNotifier {
    /// Create a notifier bound to a key
    pub fn new(key: DeviceKey, tx: Sender<DeviceEvent>) -> Self {
        Self { key, tx }
    }

    /// Get the key this notifier reports for
    pub fn key(&self) -> &DeviceKey {
        &self.key
    }

    pub fn connection_state_changed(&self, state: ConnectionState) {
        let _ = self.tx.send(DeviceEvent::ConnectionStateChanged {
            key: self.key.clone(),
            state,
        });
    }

    pub fn progress_changed(&self, progress: f64) {
        let _ = self.tx.send(DeviceEvent::ProgressChanged {
            key: self.key.clone(),
            progress,
        });
    }

    pub fn firmware_update_changed(&self, finished: bool) {
        let _ = self.tx.send(DeviceEvent::FirmwareUpdateChanged {
            key: self.key.clone(),
            finished,
        });
    }
}

/// One logical connection to a printer
pub trait ManagedDevice: Send {
    /// Registry key this device was created for
    fn key(&self) -> &DeviceKey;

    /// Port the device is talking to, once known
    fn serial_port(&self) -> Option<SerialPort>;

    fn connection_state(&self) -> ConnectionState;

    /// Progress of the current operation (0-100)
    fn progress(&self) -> f64;

    /// Last error code, 0 if none
    fn error_code(&self) -> u32;

    fn firmware_update_finished(&self) -> bool;

    fn connect(&mut self);

    fn close(&mut self);

    /// Queue a command for the printer
    ///
    /// Fails with [`DeviceError::NotConnected`] unless the connection is open.
    fn send_command(&mut self, command: &str) -> Result<(), DeviceError>;

    /// Start flashing a firmware image
    ///
    /// Fails with [`DeviceError::FirmwareNotFound`] if the image is absent.
    fn update_firmware(&mut self, file: &Path, update_eeprom: bool) -> Result<(), DeviceError>;

    fn reset_firmware_update(&mut self);

    /// Set progress as `value` out of `max`
    fn set_progress(&mut self, value: f64, max: f64);
}

/// Creates managed devices for the registry
pub trait DeviceFactory: Send {
    fn create(&self, key: &DeviceKey, notifier: DeviceNotifier) -> Box<dyn ManagedDevice>;
}
