//! Port set reconciliation
//!
//! Turns successive scan results into registry requests. The reconciler only
//! decides; the manager applies the requests on its own thread.

use std::collections::BTreeSet;

use usbprint_detect::SerialPort;

use crate::config::DeviceMode;
use crate::device::DeviceKey;

/// Change the registry should make
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryRequest {
    /// Create and publish a device for the key
    AddDevice(DeviceKey),
    /// Close and retract one device
    RemoveDevice(DeviceKey),
    /// Close and retract every device
    RemoveAll,
}

/// Diffs scan results against the previously observed port set
#[derive(Debug, Clone)]
pub struct Reconciler {
    mode: DeviceMode,
    known: BTreeSet<SerialPort>,
}

impl Reconciler {
    /// Create a reconciler that has seen no ports yet
    pub fn new(mode: DeviceMode) -> Self {
        Self {
            mode,
            known: BTreeSet::new(),
        }
    }

    /// Get the device mode
    pub fn mode(&self) -> DeviceMode {
        self.mode
    }

    /// Ports seen by the last scan
    pub fn known_ports(&self) -> &BTreeSet<SerialPort> {
        &self.known
    }

    /// Record a scan result and return the registry changes it implies
    ///
    /// In autodetect mode only the empty/non-empty boundary matters: one
    /// `AddDevice(Autodetect)` when ports first appear and one `RemoveAll`
    /// when the last one goes. Changes between non-empty sets are ignored.
    pub fn observe(&mut self, ports: &BTreeSet<SerialPort>) -> Vec<RegistryRequest> {
        let requests = match self.mode {
            DeviceMode::Autodetect => {
                if self.known.is_empty() && !ports.is_empty() {
                    vec![RegistryRequest::AddDevice(DeviceKey::Autodetect)]
                } else if !self.known.is_empty() && ports.is_empty() {
                    vec![RegistryRequest::RemoveAll]
                } else {
                    Vec::new()
                }
            }
            DeviceMode::PerPort => {
                let removed = self
                    .known
                    .difference(ports)
                    .map(|p| RegistryRequest::RemoveDevice(DeviceKey::Port(p.clone())));
                let added = ports
                    .difference(&self.known)
                    .map(|p| RegistryRequest::AddDevice(DeviceKey::Port(p.clone())));
                removed.chain(added).collect()
            }
        };

        self.known = ports.clone();
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ports(names: &[&str]) -> BTreeSet<SerialPort> {
        names.iter().map(|n| SerialPort::new(*n)).collect()
    }

    #[test]
    fn test_autodetect_transitions() {
        let mut reconciler = Reconciler::new(DeviceMode::Autodetect);

        assert!(reconciler.observe(&ports(&[])).is_empty());
        assert_eq!(
            reconciler.observe(&ports(&["/dev/ttyUSB0"])),
            vec![RegistryRequest::AddDevice(DeviceKey::Autodetect)]
        );
        // Different non-empty set: still one printer
        assert!(reconciler
            .observe(&ports(&["/dev/ttyUSB0", "/dev/ttyACM0"]))
            .is_empty());
        assert!(reconciler.observe(&ports(&["/dev/ttyACM0"])).is_empty());
        assert_eq!(
            reconciler.observe(&ports(&[])),
            vec![RegistryRequest::RemoveAll]
        );
        // Staying empty does not repeat the removal
        assert!(reconciler.observe(&ports(&[])).is_empty());
    }

    #[test]
    fn test_per_port_transitions() {
        let mut reconciler = Reconciler::new(DeviceMode::PerPort);

        assert_eq!(
            reconciler.observe(&ports(&["/dev/ttyUSB0"])),
            vec![RegistryRequest::AddDevice(DeviceKey::Port(
                "/dev/ttyUSB0".into()
            ))]
        );
        assert_eq!(
            reconciler.observe(&ports(&["/dev/ttyACM0"])),
            vec![
                RegistryRequest::RemoveDevice(DeviceKey::Port("/dev/ttyUSB0".into())),
                RegistryRequest::AddDevice(DeviceKey::Port("/dev/ttyACM0".into())),
            ]
        );
        assert!(reconciler.observe(&ports(&["/dev/ttyACM0"])).is_empty());
        assert_eq!(reconciler.known_ports(), &ports(&["/dev/ttyACM0"]));
    }

    fn scan_sequence() -> impl Strategy<Value = Vec<BTreeSet<SerialPort>>> {
        let port = prop::sample::select(vec!["/dev/ttyUSB0", "/dev/ttyUSB1", "/dev/ttyACM0"]);
        prop::collection::vec(
            prop::collection::btree_set(port.prop_map(SerialPort::new), 0..3),
            0..30,
        )
    }

    proptest! {
        #[test]
        fn autodetect_fires_once_per_boundary(scans in scan_sequence()) {
            let mut reconciler = Reconciler::new(DeviceMode::Autodetect);
            let mut previous_empty = true;
            let mut expected_adds = 0;
            let mut expected_removes = 0;
            let mut adds = 0;
            let mut removes = 0;

            for scan in &scans {
                if previous_empty && !scan.is_empty() {
                    expected_adds += 1;
                }
                if !previous_empty && scan.is_empty() {
                    expected_removes += 1;
                }
                previous_empty = scan.is_empty();

                for request in reconciler.observe(scan) {
                    match request {
                        RegistryRequest::AddDevice(DeviceKey::Autodetect) => adds += 1,
                        RegistryRequest::RemoveAll => removes += 1,
                        other => prop_assert!(false, "unexpected request {:?}", other),
                    }
                }
            }

            prop_assert_eq!(adds, expected_adds);
            prop_assert_eq!(removes, expected_removes);
        }

        #[test]
        fn per_port_keys_track_last_scan(scans in scan_sequence()) {
            let mut reconciler = Reconciler::new(DeviceMode::PerPort);
            let mut registry: BTreeSet<DeviceKey> = BTreeSet::new();

            for scan in &scans {
                for request in reconciler.observe(scan) {
                    match request {
                        RegistryRequest::AddDevice(key) => prop_assert!(registry.insert(key)),
                        RegistryRequest::RemoveDevice(key) => prop_assert!(registry.remove(&key)),
                        RegistryRequest::RemoveAll => prop_assert!(false, "unexpected RemoveAll"),
                    }
                }
                let expected: BTreeSet<DeviceKey> =
                    scan.iter().cloned().map(DeviceKey::Port).collect();
                prop_assert_eq!(&registry, &expected);
            }
        }
    }
}
