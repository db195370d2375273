//! Printer Firmware Selection Library
//!
//! This crate maps a machine definition identifier and its hardware options
//! to the name of the firmware image that should be flashed, and resolves
//! that name against a firmware storage directory.
//!
//! # Example
//!
//! ```rust
//! use usbprint_firmware::{select_firmware, HostPlatform};
//!
//! let name = select_firmware("ultimaker_original", true, false, HostPlatform::Linux);
//! assert_eq!(name.as_deref(), Some("MarlinUltimaker-HBK-115200.hex"));
//!
//! assert_eq!(select_firmware("unknown_machine_x", false, false, HostPlatform::Other), None);
//! ```

pub mod error;
pub mod machine;
pub mod resources;
pub mod selector;
pub mod tables;
pub mod uri;

pub use error::FirmwareError;
pub use machine::{MachineFamily, MachineId};
pub use resources::{FirmwareStorage, ResourceResolver};
pub use selector::{select_firmware, select_for_machine, HostPlatform};
pub use uri::normalize_file_name;
