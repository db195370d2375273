//! Error types for port detection

use thiserror::Error;

/// Errors that can occur while scanning for serial ports
#[derive(Debug, Error)]
pub enum DetectError {
    /// Failed to enumerate serial ports
    #[error("failed to enumerate ports: {0}")]
    EnumerationFailed(String),

    /// Scanning is not implemented for this host
    #[error("serial port scanning is not supported on {0}")]
    UnsupportedPlatform(&'static str),

    /// A device path pattern could not be compiled
    #[error("invalid device pattern {pattern}: {reason}")]
    Glob { pattern: String, reason: String },
}
