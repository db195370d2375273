//! Managed device registry and aggregate state

use std::collections::BTreeMap;

use usbprint_detect::SerialPort;

use crate::device::{ConnectionState, DeviceKey, ManagedDevice};

/// Devices owned by the manager, keyed by port or the autodetect sentinel
#[derive(Default)]
pub struct DeviceRegistry {
    devices: BTreeMap<DeviceKey, Box<dyn ManagedDevice>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a device; an existing entry for the key is kept
    ///
    /// Returns false (and drops `device`) if the key was already registered.
    pub fn insert(&mut self, key: DeviceKey, device: Box<dyn ManagedDevice>) -> bool {
        if self.devices.contains_key(&key) {
            return false;
        }
        self.devices.insert(key, device);
        true
    }

    pub fn remove(&mut self, key: &DeviceKey) -> Option<Box<dyn ManagedDevice>> {
        self.devices.remove(key)
    }

    /// Take every device out of the registry
    pub fn drain(&mut self) -> Vec<(DeviceKey, Box<dyn ManagedDevice>)> {
        std::mem::take(&mut self.devices).into_iter().collect()
    }

    pub fn get(&self, key: &DeviceKey) -> Option<&dyn ManagedDevice> {
        self.devices.get(key).map(|d| d.as_ref())
    }

    pub fn get_mut(&mut self, key: &DeviceKey) -> Option<&mut (dyn ManagedDevice + 'static)> {
        self.devices.get_mut(key).map(|d| d.as_mut())
    }

    /// Find the key of the device talking to a port
    ///
    /// Matches a per-port key directly, or any device whose detected port is
    /// `port`.
    pub fn key_for_port(&self, port: &SerialPort) -> Option<DeviceKey> {
        let direct = DeviceKey::Port(port.clone());
        if self.devices.contains_key(&direct) {
            return Some(direct);
        }
        self.devices
            .iter()
            .find(|(_, device)| device.serial_port().as_ref() == Some(port))
            .map(|(key, _)| key.clone())
    }

    /// The only registered device, if there is exactly one
    pub fn single_mut(&mut self) -> Option<&mut (dyn ManagedDevice + 'static)> {
        if self.devices.len() != 1 {
            return None;
        }
        self.devices.values_mut().next().map(|d| d.as_mut())
    }

    pub fn contains(&self, key: &DeviceKey) -> bool {
        self.devices.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &DeviceKey> {
        self.devices.keys()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&DeviceKey, &mut Box<dyn ManagedDevice>)> {
        self.devices.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Mean progress over all devices, None when the registry is empty
    pub fn progress(&self) -> Option<f64> {
        if self.devices.is_empty() {
            return None;
        }
        let total: f64 = self.devices.values().map(|d| d.progress()).sum();
        Some(total / self.devices.len() as f64)
    }

    /// First non-zero error code in key order
    pub fn error_code(&self) -> Option<u32> {
        self.devices
            .values()
            .map(|d| d.error_code())
            .find(|&code| code != 0)
    }

    /// True if every device finished its firmware update (vacuously when empty)
    pub fn firmware_update_complete(&self) -> bool {
        self.devices.values().all(|d| d.firmware_update_finished())
    }

    /// Keys of devices in the connected state
    pub fn connected(&self) -> Vec<DeviceKey> {
        self.devices
            .iter()
            .filter(|(_, d)| d.connection_state() == ConnectionState::Connected)
            .map(|(key, _)| key.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use proptest::prelude::*;

    use crate::error::DeviceError;

    struct Stub {
        key: DeviceKey,
        port: Option<SerialPort>,
        state: ConnectionState,
        progress: f64,
        error_code: u32,
        finished: bool,
    }

    impl Stub {
        fn new(key: DeviceKey) -> Self {
            Self {
                key,
                port: None,
                state: ConnectionState::Closed,
                progress: 0.0,
                error_code: 0,
                finished: false,
            }
        }
    }

    impl ManagedDevice for Stub {
        fn key(&self) -> &DeviceKey {
            &self.key
        }
        fn serial_port(&self) -> Option<SerialPort> {
            self.port.clone()
        }
        fn connection_state(&self) -> ConnectionState {
            self.state
        }
        fn progress(&self) -> f64 {
            self.progress
        }
        fn error_code(&self) -> u32 {
            self.error_code
        }
        fn firmware_update_finished(&self) -> bool {
            self.finished
        }
        fn connect(&mut self) {}
        fn close(&mut self) {}
        fn send_command(&mut self, _command: &str) -> Result<(), DeviceError> {
            Ok(())
        }
        fn update_firmware(&mut self, _file: &Path, _eeprom: bool) -> Result<(), DeviceError> {
            Ok(())
        }
        fn reset_firmware_update(&mut self) {}
        fn set_progress(&mut self, value: f64, max: f64) {
            self.progress = value / max * 100.0;
        }
    }

    fn port_key(name: &str) -> DeviceKey {
        DeviceKey::Port(SerialPort::new(name))
    }

    #[test]
    fn test_insert_keeps_existing() {
        let mut registry = DeviceRegistry::new();
        let mut first = Stub::new(DeviceKey::Autodetect);
        first.progress = 10.0;

        assert!(registry.insert(DeviceKey::Autodetect, Box::new(first)));
        assert!(!registry.insert(DeviceKey::Autodetect, Box::new(Stub::new(DeviceKey::Autodetect))));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&DeviceKey::Autodetect).unwrap().progress(), 10.0);
    }

    #[test]
    fn test_empty_aggregates() {
        let registry = DeviceRegistry::new();
        assert_eq!(registry.progress(), None);
        assert_eq!(registry.error_code(), None);
        assert!(registry.firmware_update_complete());
        assert!(registry.connected().is_empty());
    }

    #[test]
    fn test_error_code_is_first_non_zero() {
        let mut registry = DeviceRegistry::new();
        let mut a = Stub::new(port_key("/dev/ttyACM0"));
        let mut b = Stub::new(port_key("/dev/ttyUSB0"));
        a.error_code = 0;
        b.error_code = 4;
        registry.insert(a.key.clone(), Box::new(a));
        registry.insert(b.key.clone(), Box::new(b));

        assert_eq!(registry.error_code(), Some(4));
    }

    #[test]
    fn test_firmware_update_complete_needs_all() {
        let mut registry = DeviceRegistry::new();
        let mut a = Stub::new(port_key("/dev/ttyACM0"));
        a.finished = true;
        let b = Stub::new(port_key("/dev/ttyUSB0"));
        registry.insert(a.key.clone(), Box::new(a));
        registry.insert(b.key.clone(), Box::new(b));

        assert!(!registry.firmware_update_complete());
    }

    #[test]
    fn test_connected_and_port_lookup() {
        let mut registry = DeviceRegistry::new();
        let mut auto = Stub::new(DeviceKey::Autodetect);
        auto.state = ConnectionState::Connected;
        auto.port = Some(SerialPort::new("/dev/ttyACM0"));
        registry.insert(DeviceKey::Autodetect, Box::new(auto));

        assert_eq!(registry.connected(), vec![DeviceKey::Autodetect]);
        assert_eq!(
            registry.key_for_port(&SerialPort::new("/dev/ttyACM0")),
            Some(DeviceKey::Autodetect)
        );
        assert_eq!(registry.key_for_port(&SerialPort::new("/dev/ttyUSB9")), None);
        assert!(registry.single_mut().is_some());

        registry.insert(port_key("/dev/ttyUSB0"), Box::new(Stub::new(port_key("/dev/ttyUSB0"))));
        assert!(registry.single_mut().is_none());
        assert_eq!(registry.drain().len(), 2);
        assert!(registry.is_empty());
    }

    proptest! {
        #[test]
        fn progress_is_arithmetic_mean(values in prop::collection::vec(0.0f64..=100.0, 1..8)) {
            let mut registry = DeviceRegistry::new();
            for (i, value) in values.iter().enumerate() {
                let key = port_key(&format!("/dev/ttyUSB{}", i));
                let mut stub = Stub::new(key.clone());
                stub.progress = *value;
                registry.insert(key, Box::new(stub));
            }

            let expected = values.iter().sum::<f64>() / values.len() as f64;
            let actual = registry.progress().unwrap();
            prop_assert!((actual - expected).abs() < 1e-9);
        }

        #[test]
        fn update_complete_iff_all_finished(flags in prop::collection::vec(any::<bool>(), 0..8)) {
            let mut registry = DeviceRegistry::new();
            for (i, finished) in flags.iter().enumerate() {
                let key = port_key(&format!("/dev/ttyACM{}", i));
                let mut stub = Stub::new(key.clone());
                stub.finished = *finished;
                registry.insert(key, Box::new(stub));
            }

            prop_assert_eq!(registry.firmware_update_complete(), flags.iter().all(|f| *f));
        }
    }
}
