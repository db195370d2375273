//! Printer manager
//!
//! Owns the device registry. Must live on the thread that owns the GUI, which
//! calls [`PrinterManager::process_pending`] regularly (e.g. once per frame)
//! to apply registry requests from the port watcher and forward device
//! notifications.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self as std_mpsc, Receiver, Sender};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use usbprint_detect::{PortSource, SerialPort};
use usbprint_firmware::{
    normalize_file_name, select_firmware, FirmwareError, HostPlatform, ResourceResolver,
};

use crate::config::ManagerConfig;
use crate::device::{DeviceEvent, DeviceFactory, DeviceKey, DeviceNotifier, ManagedDevice};
use crate::directory::OutputDeviceDirectory;
use crate::error::{DeviceError, ManagerError};
use crate::events::ManagerEvent;
use crate::reconciler::RegistryRequest;
use crate::registry::DeviceRegistry;

/// Machine definition and hardware options, as configured by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineProfile {
    /// Machine definition id (e.g., "ultimaker_original")
    pub machine_id: String,
    /// Heated bed fitted
    pub has_heated_bed: bool,
    /// LCD controller fitted
    pub has_lcd: bool,
}

/// Collaborators the manager is wired to
pub struct ManagerServices {
    /// Creates managed devices
    pub factory: Box<dyn DeviceFactory>,
    /// Host application's output device list
    pub directory: Box<dyn OutputDeviceDirectory>,
    /// Firmware image storage
    pub resolver: Box<dyn ResourceResolver>,
    /// Port enumeration for the port list
    pub ports: Arc<dyn PortSource>,
}

/// Outcome of a firmware update across all devices
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FirmwareUpdateReport {
    /// Devices the update was dispatched to
    pub started: Vec<DeviceKey>,
    /// Devices that could not start the update
    pub failed: Vec<DeviceKey>,
}

impl FirmwareUpdateReport {
    /// Check if every device started the update
    pub fn all_started(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Registry owner and GUI-facing facade
pub struct PrinterManager {
    config: ManagerConfig,
    registry: DeviceRegistry,
    services: ManagerServices,
    platform: HostPlatform,
    /// Registry requests from the port watcher
    request_rx: mpsc::Receiver<RegistryRequest>,
    /// Cloned into every device notifier
    device_tx: Sender<DeviceEvent>,
    device_rx: Receiver<DeviceEvent>,
    event_tx: Sender<ManagerEvent>,
}

impl PrinterManager {
    /// Create a manager with an empty registry
    pub fn new(
        config: ManagerConfig,
        services: ManagerServices,
        request_rx: mpsc::Receiver<RegistryRequest>,
        event_tx: Sender<ManagerEvent>,
    ) -> Self {
        let (device_tx, device_rx) = std_mpsc::channel();

        Self {
            config,
            registry: DeviceRegistry::new(),
            services,
            platform: HostPlatform::current(),
            request_rx,
            device_tx,
            device_rx,
            event_tx,
        }
    }

    /// Override the host platform used for firmware selection
    pub fn with_platform(mut self, platform: HostPlatform) -> Self {
        self.platform = platform;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Get the registry (read-only)
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Get a managed device by key
    pub fn device(&self, key: &DeviceKey) -> Option<&dyn ManagedDevice> {
        self.registry.get(key)
    }

    // -------------------------------------------------------------------------
    // Event pumping
    // -------------------------------------------------------------------------

    /// Apply pending registry requests and forward device notifications
    pub fn process_pending(&mut self) {
        self.process_requests();
        self.process_device_events();
    }

    /// Apply registry requests queued by the port watcher
    ///
    /// Returns the number of requests applied.
    pub fn process_requests(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(request) = self.request_rx.try_recv() {
            self.apply_request(request);
            applied += 1;
        }
        applied
    }

    /// Apply a single registry request
    pub fn apply_request(&mut self, request: RegistryRequest) {
        match request {
            RegistryRequest::AddDevice(key) => self.add_device(key),
            RegistryRequest::RemoveDevice(key) => self.remove_device(&key),
            RegistryRequest::RemoveAll => self.remove_all(),
        }
    }

    /// Forward device notifications as manager events
    pub fn process_device_events(&mut self) {
        while let Ok(event) = self.device_rx.try_recv() {
            if !self.registry.contains(event.key()) {
                warn!(
                    "Notification from {} dropped, device is no longer registered",
                    event.key()
                );
                continue;
            }

            let forwarded = match event {
                DeviceEvent::ConnectionStateChanged { key, state } => {
                    debug!("Connection state of {} changed to {:?}", key, state);
                    ManagerEvent::ConnectionStateChanged { key, state }
                }
                DeviceEvent::ProgressChanged { key, progress } => {
                    ManagerEvent::ProgressChanged { key, progress }
                }
                DeviceEvent::FirmwareUpdateChanged { key, finished } => {
                    ManagerEvent::FirmwareUpdateChanged { key, finished }
                }
            };
            self.emit(forwarded);
        }
    }

    // -------------------------------------------------------------------------
    // Registry transitions
    // -------------------------------------------------------------------------

    fn add_device(&mut self, key: DeviceKey) {
        if self.registry.contains(&key) {
            warn!("Device {} already registered, ignoring add", key);
            return;
        }

        let notifier = DeviceNotifier::new(key.clone(), self.device_tx.clone());
        let device = self.services.factory.create(&key, notifier);
        self.registry.insert(key.clone(), device);
        self.services
            .directory
            .add_output_device(&key, &key.to_string());

        info!("Added USB printer {}", key);
        self.emit(ManagerEvent::DeviceAdded { key });
    }

    fn remove_device(&mut self, key: &DeviceKey) {
        let Some(mut device) = self.registry.remove(key) else {
            debug!("Device {} not registered, ignoring remove", key);
            return;
        };

        device.close();
        self.services.directory.remove_output_device(key);

        info!("Removed USB printer {}", key);
        self.emit(ManagerEvent::DeviceRemoved { key: key.clone() });
    }

    /// Close every device and retract it from the directory
    pub fn remove_all(&mut self) {
        if self.registry.is_empty() {
            debug!("No USB printers to remove");
            return;
        }

        for (key, mut device) in self.registry.drain() {
            device.close();
            self.services.directory.remove_output_device(&key);
            info!("Removed USB printer {}", key);
            self.emit(ManagerEvent::DeviceRemoved { key });
        }
    }

    // -------------------------------------------------------------------------
    // Aggregate state
    // -------------------------------------------------------------------------

    /// Mean progress over all devices, None with no devices
    pub fn progress(&self) -> Option<f64> {
        self.registry.progress()
    }

    /// First non-zero device error code
    pub fn error_code(&self) -> Option<u32> {
        self.registry.error_code()
    }

    /// True if no device is still flashing firmware
    pub fn firmware_update_complete(&self) -> bool {
        self.registry.firmware_update_complete()
    }

    /// Devices currently connected
    pub fn connected_printers(&self) -> Vec<DeviceKey> {
        self.registry.connected()
    }

    /// Every serial port on the host, USB or not
    pub fn port_list(&self) -> Vec<SerialPort> {
        match self.services.ports.scan(false) {
            Ok(ports) => ports.into_iter().collect(),
            Err(e) => {
                warn!("Failed to list serial ports: {}", e);
                Vec::new()
            }
        }
    }

    // -------------------------------------------------------------------------
    // Firmware
    // -------------------------------------------------------------------------

    /// Name of the firmware image for a machine profile on this host
    pub fn default_firmware_name(&self, profile: &MachineProfile) -> Option<String> {
        select_firmware(
            &profile.machine_id,
            profile.has_heated_bed,
            profile.has_lcd,
            self.platform,
        )
    }

    /// Path of the firmware image for a machine profile
    pub fn default_firmware_path(&self, profile: &MachineProfile) -> Result<PathBuf, ManagerError> {
        let name = self.default_firmware_name(profile).ok_or_else(|| {
            warn!("Could not find any firmware for machine {}", profile.machine_id);
            ManagerError::NoFirmwareForMachine(profile.machine_id.clone())
        })?;

        self.services.resolver.resolve(&name).map_err(|e| match e {
            FirmwareError::ResourceNotFound { name, .. } => ManagerError::ResourceNotFound(name),
            other => ManagerError::Firmware(other),
        })
    }

    /// Flash a firmware image to every managed device
    ///
    /// A device that cannot find the image is marked complete and reported,
    /// and the remaining devices are still updated.
    pub fn update_all_firmware(
        &mut self,
        file_name: &str,
        update_eeprom: bool,
    ) -> Result<FirmwareUpdateReport, ManagerError> {
        let file = normalize_file_name(file_name)?;

        if self.registry.is_empty() {
            self.notify("Unable to update firmware because there are no printers connected.");
            return Err(ManagerError::NoDevicesConnected);
        }

        for (_, device) in self.registry.iter_mut() {
            device.reset_firmware_update();
        }
        self.emit(ManagerEvent::FirmwareViewOpened { port: None });

        let mut report = FirmwareUpdateReport::default();
        let mut failures = Vec::new();

        for (key, device) in self.registry.iter_mut() {
            match device.update_firmware(&file, update_eeprom) {
                Ok(()) => report.started.push(key.clone()),
                Err(e) => {
                    if matches!(e, DeviceError::FirmwareNotFound(_)) {
                        device.set_progress(100.0, 100.0);
                    }
                    warn!(
                        "Firmware update failed for printer {} with '{}': {}",
                        key,
                        file.display(),
                        e
                    );
                    report.failed.push(key.clone());
                    failures.push((key.clone(), e));
                }
            }
        }

        for (key, e) in failures {
            let message = match e {
                DeviceError::FirmwareNotFound(_) => {
                    format!("Could not find firmware required for the printer at {}.", key)
                }
                other => format!("Could not update firmware for the printer at {}: {}", key, other),
            };
            self.notify(message);
            self.emit(ManagerEvent::FirmwareViewClosed);
        }

        Ok(report)
    }

    /// Flash a firmware image to the device on one port
    ///
    /// The port is matched against per-port keys and against the port each
    /// device reports, so an autodetecting printer answers for the port it
    /// has bound. Use [`update_firmware_for_device`](Self::update_firmware_for_device)
    /// to address a device by its registry key instead.
    pub fn update_firmware_by_serial(
        &mut self,
        port: &SerialPort,
        file_name: &str,
    ) -> Result<(), ManagerError> {
        let file = normalize_file_name(file_name)?;

        let Some(key) = self.registry.key_for_port(port) else {
            self.notify(format!("There is no printer connected to {}.", port));
            return Err(ManagerError::DeviceNotFound(port.clone()));
        };

        self.flash_device(&key, &file, Some(port.clone()))
    }

    /// Flash a firmware image to the device registered under `key`
    pub fn update_firmware_for_device(
        &mut self,
        key: &DeviceKey,
        file_name: &str,
    ) -> Result<(), ManagerError> {
        let file = normalize_file_name(file_name)?;

        if !self.registry.contains(key) {
            self.notify(format!("There is no printer registered as {}.", key));
            return Err(ManagerError::UnknownDevice(key.clone()));
        }

        self.flash_device(key, &file, key.port().cloned())
    }

    fn flash_device(
        &mut self,
        key: &DeviceKey,
        file: &Path,
        requested_port: Option<SerialPort>,
    ) -> Result<(), ManagerError> {
        let view_port = self
            .registry
            .get(key)
            .and_then(|device| device.serial_port())
            .or(requested_port);
        self.emit(ManagerEvent::FirmwareViewOpened { port: view_port });

        let result = match self.registry.get_mut(key) {
            Some(device) => device.update_firmware(file, false),
            None => return Err(ManagerError::UnknownDevice(key.clone())),
        };

        if let Err(e) = result {
            self.emit(ManagerEvent::FirmwareViewClosed);
            return Err(match e {
                DeviceError::FirmwareNotFound(path) => {
                    error!(
                        "Could not find firmware required for this machine called '{}'",
                        path.display()
                    );
                    ManagerError::ResourceNotFound(path.display().to_string())
                }
                other => ManagerError::Device(other),
            });
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Current printer commands
    // -------------------------------------------------------------------------

    /// Send a command to the only managed device
    ///
    /// Returns false unless exactly one device is registered and it accepted
    /// the command.
    pub fn send_command_to_current_printer(&mut self, command: &str) -> bool {
        let Some(device) = self.registry.single_mut() else {
            return false;
        };

        match device.send_command(command) {
            Ok(()) => true,
            Err(e) => {
                warn!("Command '{}' not sent to {}: {}", command, device.key(), e);
                false
            }
        }
    }

    /// Connect the only managed device
    ///
    /// Returns false unless exactly one device is registered.
    pub fn connect_to_current_printer(&mut self) -> bool {
        match self.registry.single_mut() {
            Some(device) => {
                device.connect();
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn notify(&self, message: impl Into<String>) {
        self.emit(ManagerEvent::Notification {
            message: message.into(),
        });
    }

    fn emit(&self, event: ManagerEvent) {
        let _ = self.event_tx.send(event);
    }
}
