//! Error types for firmware lookup

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating a firmware image
#[derive(Debug, Error)]
pub enum FirmwareError {
    /// The firmware file does not exist in storage
    #[error("firmware {name} not found in {}", root.display())]
    ResourceNotFound { name: String, root: PathBuf },

    /// The machine identifier is not a known machine definition
    #[error("unknown machine: {0}")]
    UnknownMachine(String),

    /// A file URI could not be converted to a local path
    #[error("invalid file URI: {0}")]
    InvalidUri(String),
}
