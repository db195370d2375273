//! USB Printer Device Manager
//!
//! This crate keeps a registry of managed printer devices in sync with the
//! serial ports attached to the host, and exposes aggregate state and
//! firmware commands to a GUI layer.
//!
//! # Architecture
//!
//! - A **port watcher** task polls a [`PortSource`](usbprint_detect::PortSource)
//!   on a fixed interval and feeds each result through a [`Reconciler`].
//! - The reconciler turns changes in the port set into [`RegistryRequest`]s,
//!   which are sent over a channel rather than applied in place.
//! - The [`PrinterManager`] lives on the thread that owns the GUI. It drains
//!   the request channel, creates and destroys devices through a
//!   [`DeviceFactory`], and publishes them to an [`OutputDeviceDirectory`].
//!
//! Device creation therefore always happens on the owning thread, and the
//! registry needs no locking.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use usbprint_detect::PortScanner;
//! use usbprint_manager::{registry_channel, ManagerConfig, PortWatcher, PrinterManager};
//!
//! let config = ManagerConfig::default();
//! let (request_tx, request_rx) = registry_channel(&config);
//! let scanner = Arc::new(PortScanner::new());
//!
//! let watcher = PortWatcher::spawn(rt.handle(), scanner.clone(), config.clone(), request_tx);
//! let mut manager = PrinterManager::new(config, services, request_rx, event_tx);
//!
//! // On every GUI frame:
//! manager.process_pending();
//! ```

pub mod config;
pub mod device;
pub mod directory;
pub mod error;
pub mod events;
pub mod manager;
pub mod reconciler;
pub mod registry;
pub mod watcher;

pub use config::{DeviceMode, ManagerConfig};
pub use device::{
    ConnectionState, DeviceEvent, DeviceFactory, DeviceKey, DeviceNotifier, ManagedDevice,
};
pub use directory::OutputDeviceDirectory;
pub use error::{DeviceError, ManagerError};
pub use events::ManagerEvent;
pub use manager::{FirmwareUpdateReport, MachineProfile, ManagerServices, PrinterManager};
pub use reconciler::{Reconciler, RegistryRequest};
pub use registry::DeviceRegistry;
pub use watcher::{registry_channel, run_port_watcher, PortWatcher};
