//! Device path patterns for POSIX hosts
//!
//! Patterns are relative to the scanner's device root so that they can be
//! evaluated against a fake tree in tests.

/// Patterns that identify USB serial adapters only
///
/// Covers Linux USB-serial and CDC-ACM nodes, macOS call-out devices for USB
/// adapters, and the WCH CH34x vendor driver names.
pub const USB_ONLY: &[&str] = &[
    "dev/ttyUSB*",
    "dev/ttyACM*",
    "dev/cu.usb*",
    "dev/tty.wchusb*",
    "dev/cu.wchusb*",
];

/// Patterns for every serial device a printer might be reachable through
///
/// Includes Bluetooth RFCOMM nodes and the stable udev by-id symlinks.
pub const ALL: &[&str] = &[
    "dev/ttyUSB*",
    "dev/ttyACM*",
    "dev/cu.*",
    "dev/tty.usb*",
    "dev/tty.wchusb*",
    "dev/cu.wchusb*",
    "dev/rfcomm*",
    "dev/serial/by-id/*",
];

/// Marker macOS puts in the names of Bluetooth serial ports, which can show
/// up among the USB call-out devices
pub const BLUETOOTH_MARKER: &str = "Bluetooth";

/// Select the pattern list for a scan
pub fn for_scan(usb_only: bool) -> &'static [&'static str] {
    if usb_only {
        USB_ONLY
    } else {
        ALL
    }
}
