//! USB Printer Serial Port Detection Library
//!
//! This crate enumerates the serial device paths a USB-connected 3D printer
//! may appear under on the host operating system.
//!
//! # Example
//!
//! ```rust,no_run
//! use usbprint_detect::PortScanner;
//!
//! let scanner = PortScanner::new();
//! let ports = scanner.scan(true).unwrap();
//!
//! for port in ports {
//!     println!("Found port: {}", port);
//! }
//! ```

pub mod error;
pub mod patterns;
pub mod port;
pub mod scanner;

pub use error::DetectError;
pub use port::SerialPort;
pub use scanner::{PortScanner, PortSource, ScannerConfig};
