//! Error types for the device manager

use std::path::PathBuf;

use thiserror::Error;
use usbprint_detect::SerialPort;
use usbprint_firmware::FirmwareError;

use crate::device::DeviceKey;

/// Errors reported by a managed device
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Firmware image missing on disk
    #[error("firmware file not found: {}", .0.display())]
    FirmwareNotFound(PathBuf),

    /// Operation needs an open connection
    #[error("device {0} is not connected")]
    NotConnected(String),
}

/// Errors that can occur in the device manager
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Firmware update requested with nothing attached
    #[error("no printers connected")]
    NoDevicesConnected,

    /// No managed device is bound to the port
    #[error("no printer on port {0}")]
    DeviceNotFound(SerialPort),

    /// No managed device is registered under the key
    #[error("no printer registered as {0}")]
    UnknownDevice(DeviceKey),

    /// Firmware image missing on disk
    #[error("firmware not found: {0}")]
    ResourceNotFound(String),

    /// No firmware image is known for the machine
    #[error("no firmware for machine {0}")]
    NoFirmwareForMachine(String),

    /// Firmware lookup error
    #[error("firmware error: {0}")]
    Firmware(#[from] FirmwareError),

    /// Device error
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}
