//! Event stream for the GUI layer
//!
//! Everything the GUI needs to refresh (registry changes, forwarded device
//! notifications, firmware view requests and user-visible messages) arrives
//! through a single channel, in the order the manager produced it.

use usbprint_detect::SerialPort;

use crate::device::{ConnectionState, DeviceKey};

/// Unified event enum for all manager activity
#[derive(Debug, Clone, PartialEq)]
pub enum ManagerEvent {
    // -------------------------------------------------------------------------
    // Registry lifecycle events
    // -------------------------------------------------------------------------
    /// A device was created and published
    DeviceAdded { key: DeviceKey },

    /// A device was closed and retracted
    DeviceRemoved { key: DeviceKey },

    // -------------------------------------------------------------------------
    // Forwarded device notifications
    // -------------------------------------------------------------------------
    /// A device's connection state changed; the connected printer list may differ
    ConnectionStateChanged {
        key: DeviceKey,
        state: ConnectionState,
    },

    /// A device's progress changed; aggregate progress may differ
    ProgressChanged { key: DeviceKey, progress: f64 },

    /// A device's firmware update state changed
    FirmwareUpdateChanged { key: DeviceKey, finished: bool },

    // -------------------------------------------------------------------------
    // Firmware workflow
    // -------------------------------------------------------------------------
    /// Show the firmware progress view
    FirmwareViewOpened {
        /// Port being flashed, None when flashing every device
        port: Option<SerialPort>,
    },

    /// Close the firmware progress view
    FirmwareViewClosed,

    /// Message for the user
    Notification { message: String },
}

impl ManagerEvent {
    /// Check if this is a registry lifecycle event
    pub fn is_device_lifecycle(&self) -> bool {
        matches!(
            self,
            ManagerEvent::DeviceAdded { .. } | ManagerEvent::DeviceRemoved { .. }
        )
    }

    /// Check if this is part of the firmware workflow
    pub fn is_firmware_workflow(&self) -> bool {
        matches!(
            self,
            ManagerEvent::FirmwareUpdateChanged { .. }
                | ManagerEvent::FirmwareViewOpened { .. }
                | ManagerEvent::FirmwareViewClosed
        )
    }

    /// Get the device key if this event is associated with a specific device
    pub fn device_key(&self) -> Option<&DeviceKey> {
        match self {
            ManagerEvent::DeviceAdded { key }
            | ManagerEvent::DeviceRemoved { key }
            | ManagerEvent::ConnectionStateChanged { key, .. }
            | ManagerEvent::ProgressChanged { key, .. }
            | ManagerEvent::FirmwareUpdateChanged { key, .. } => Some(key),
            _ => None,
        }
    }
}
