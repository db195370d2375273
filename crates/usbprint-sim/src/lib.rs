//! USB Printer Simulation Library
//!
//! This crate provides stand-ins for the collaborators of the device manager
//! so that it can be exercised without printers attached:
//!
//! - **SimulatedPrinter**: a managed device that connects instantly and
//!   "flashes" firmware by walking its progress to 100%
//! - **RecordingDirectory**: an output device directory that records changes
//! - **ScriptedPorts**: a port source that replays a list of scan results
//!
//! # Example
//!
//! ```rust
//! use usbprint_sim::{SimulatedPrinterConfig, SimulatedPrinterFactory};
//!
//! let factory = SimulatedPrinterFactory::new(SimulatedPrinterConfig::default());
//! let log = factory.log();
//!
//! // Hand `factory` to the PrinterManager, then inspect `log.records()`
//! assert!(log.records().is_empty());
//! ```

pub mod directory;
pub mod ports;
pub mod printer;

pub use directory::{DirectoryChange, RecordingDirectory};
pub use ports::ScriptedPorts;
pub use printer::{
    SimulatedPrinter, SimulatedPrinterConfig, SimulatedPrinterFactory, SimulationLog,
    SimulationRecord,
};
