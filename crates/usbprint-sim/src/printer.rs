//! Simulated printer
//!
//! Implements the managed device contract without a serial port. Every state
//! change is reported through the device notifier exactly as a real device
//! would, and every action is appended to a shared [`SimulationLog`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use usbprint_detect::SerialPort;
use usbprint_manager::{
    ConnectionState, DeviceError, DeviceFactory, DeviceKey, DeviceNotifier, ManagedDevice,
};

/// Configuration for simulated printers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedPrinterConfig {
    /// Port an autodetecting printer reports once connected
    pub detected_port: Option<SerialPort>,
    /// Connect as soon as the printer is created
    pub auto_connect: bool,
    /// Progress added per simulated flash step (percent)
    pub flash_step: f64,
}

impl Default for SimulatedPrinterConfig {
    fn default() -> Self {
        Self {
            detected_port: None,
            auto_connect: false,
            flash_step: 25.0,
        }
    }
}

/// Something a simulated printer did
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationRecord {
    Created(DeviceKey),
    Connected(DeviceKey),
    Closed(DeviceKey),
    Command {
        key: DeviceKey,
        command: String,
    },
    Flashed {
        key: DeviceKey,
        file: PathBuf,
        update_eeprom: bool,
    },
}

/// Shared, append-only record of simulated printer activity
#[derive(Debug, Clone, Default)]
pub struct SimulationLog {
    records: Arc<Mutex<Vec<SimulationRecord>>>,
}

impl SimulationLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, record: SimulationRecord) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<SimulationRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Count records matching a predicate
    pub fn count(&self, predicate: impl Fn(&SimulationRecord) -> bool) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| predicate(r))
            .count()
    }
}

/// A printer that exists only in memory
pub struct SimulatedPrinter {
    key: DeviceKey,
    config: SimulatedPrinterConfig,
    notifier: DeviceNotifier,
    log: SimulationLog,
    port: Option<SerialPort>,
    state: ConnectionState,
    progress: f64,
    error_code: u32,
    update_finished: bool,
    /// Report every firmware image as missing
    firmware_missing: bool,
}

impl SimulatedPrinter {
    /// Create a closed printer
    pub fn new(
        key: DeviceKey,
        config: SimulatedPrinterConfig,
        notifier: DeviceNotifier,
        log: SimulationLog,
    ) -> Self {
        log.record(SimulationRecord::Created(key.clone()));

        Self {
            key,
            config,
            notifier,
            log,
            port: None,
            state: ConnectionState::Closed,
            progress: 0.0,
            error_code: 0,
            update_finished: false,
            firmware_missing: false,
        }
    }

    /// Make every firmware update fail with a missing image
    pub fn set_firmware_missing(&mut self, missing: bool) {
        self.firmware_missing = missing;
    }

    /// Set the error code reported to the manager
    pub fn set_error_code(&mut self, code: u32) {
        self.error_code = code;
        if code != 0 {
            self.set_state(ConnectionState::Error);
        }
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            self.state = state;
            self.notifier.connection_state_changed(state);
        }
    }

    fn set_progress_percent(&mut self, percent: f64) {
        self.progress = percent.clamp(0.0, 100.0);
        self.notifier.progress_changed(self.progress);
    }
}

impl ManagedDevice for SimulatedPrinter {
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
        self.update_finished
    }

    fn connect(&mut self) {
        if self.state == ConnectionState::Connected {
            return;
        }

        self.set_state(ConnectionState::Connecting);
        self.port = self
            .key
            .port()
            .cloned()
            .or_else(|| self.config.detected_port.clone());
        self.set_state(ConnectionState::Connected);

        debug!("Simulated printer {} connected", self.key);
        self.log.record(SimulationRecord::Connected(self.key.clone()));
    }

    fn close(&mut self) {
        self.set_state(ConnectionState::Closed);
        self.log.record(SimulationRecord::Closed(self.key.clone()));
    }

    fn send_command(&mut self, command: &str) -> Result<(), DeviceError> {
        if self.state != ConnectionState::Connected {
            warn!("Simulated printer {} got '{}' while not connected", self.key, command);
            return Err(DeviceError::NotConnected(self.key.to_string()));
        }
        self.log.record(SimulationRecord::Command {
            key: self.key.clone(),
            command: command.to_string(),
        });
        Ok(())
    }

    fn update_firmware(&mut self, file: &Path, update_eeprom: bool) -> Result<(), DeviceError> {
        if self.firmware_missing || !file.is_file() {
            return Err(DeviceError::FirmwareNotFound(file.to_path_buf()));
        }

        let previous = self.state;
        self.set_state(ConnectionState::Busy);
        self.update_finished = false;
        self.notifier.firmware_update_changed(false);

        let step = if self.config.flash_step > 0.0 {
            self.config.flash_step
        } else {
            100.0
        };
        let mut percent = 0.0;
        while percent < 100.0 {
            percent = (percent + step).min(100.0);
            self.set_progress_percent(percent);
        }

        self.update_finished = true;
        self.notifier.firmware_update_changed(true);
        self.set_state(previous);

        self.log.record(SimulationRecord::Flashed {
            key: self.key.clone(),
            file: file.to_path_buf(),
            update_eeprom,
        });
        Ok(())
    }

    fn reset_firmware_update(&mut self) {
        self.update_finished = false;
        self.set_progress_percent(0.0);
        self.notifier.firmware_update_changed(false);
    }

    fn set_progress(&mut self, value: f64, max: f64) {
        let percent = if max > 0.0 { value / max * 100.0 } else { 0.0 };
        self.set_progress_percent(percent);
    }
}

/// Creates simulated printers for the device manager
#[derive(Debug, Clone, Default)]
pub struct SimulatedPrinterFactory {
    config: SimulatedPrinterConfig,
    log: SimulationLog,
    missing_firmware: BTreeSet<DeviceKey>,
}

impl SimulatedPrinterFactory {
    pub fn new(config: SimulatedPrinterConfig) -> Self {
        Self {
            config,
            log: SimulationLog::new(),
            missing_firmware: BTreeSet::new(),
        }
    }

    /// Printers created for `key` report every firmware image as missing
    pub fn with_missing_firmware(mut self, key: DeviceKey) -> Self {
        self.missing_firmware.insert(key);
        self
    }

    /// Handle to the log shared by every printer this factory creates
    pub fn log(&self) -> SimulationLog {
        self.log.clone()
    }
}

impl DeviceFactory for SimulatedPrinterFactory {
    fn create(&self, key: &DeviceKey, notifier: DeviceNotifier) -> Box<dyn ManagedDevice> {
        let mut printer =
            SimulatedPrinter::new(key.clone(), self.config.clone(), notifier, self.log.clone());
        printer.set_firmware_missing(self.missing_firmware.contains(key));
        if self.config.auto_connect {
            printer.connect();
        }
        Box::new(printer)
    }
}
