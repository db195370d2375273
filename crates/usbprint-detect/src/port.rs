//! Serial port identity

use std::fmt;

use serde::{Deserialize, Serialize};

/// A serial port path or name (e.g., /dev/ttyUSB0, COM3)
///
/// Opaque apart from equality and ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialPort(String);

impl SerialPort {
    /// Create a port from its path or name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the port path or name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SerialPort {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SerialPort {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for SerialPort {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
