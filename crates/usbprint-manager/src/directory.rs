//! Output device directory
//!
//! The host application's list of output devices. The manager publishes each
//! device it creates and retracts it when the device goes away.

use crate::device::DeviceKey;

/// Host application's general output device list
pub trait OutputDeviceDirectory: Send {
    /// Publish a device under its key
    fn add_output_device(&mut self, key: &DeviceKey, name: &str);

    /// Retract a previously published device
    fn remove_output_device(&mut self, key: &DeviceKey);
}
