//! Firmware image selection

use tracing::{debug, warn};

use crate::machine::{MachineFamily, MachineId};
use crate::tables::{self, BAUDRATE_PLACEHOLDER};

/// Host platform class, as far as firmware selection cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    /// Linux hosts cannot open the serial port at 250000 baud reliably
    Linux,
    /// Every other host
    Other,
}

impl HostPlatform {
    /// Platform class of the running host
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// Baud rate the firmware image must be built for
    pub fn baud_rate(&self) -> u32 {
        match self {
            Self::Linux => 115_200,
            Self::Other => 250_000,
        }
    }
}

/// Select the firmware image name for a machine definition id
///
/// Returns `None` when the id is not a machine with a known firmware image.
pub fn select_firmware(
    machine_id: &str,
    has_heated_bed: bool,
    has_lcd: bool,
    platform: HostPlatform,
) -> Option<String> {
    match machine_id.parse::<MachineId>() {
        Ok(machine) => Some(select_for_machine(
            machine,
            has_heated_bed,
            has_lcd,
            platform,
        )),
        Err(_) => {
            warn!("There is no firmware for machine {}", machine_id);
            None
        }
    }
}

/// Select the firmware image name for a known machine
///
/// A heated-bed build wins over the base image and an LCD build wins over the
/// family default whenever the matching flag is set.
pub fn select_for_machine(
    machine: MachineId,
    has_heated_bed: bool,
    has_lcd: bool,
    platform: HostPlatform,
) -> String {
    let template = match machine.family() {
        MachineFamily::Standard => match tables::heated_bed_image(machine) {
            Some(image) if has_heated_bed => {
                debug!("Choosing firmware with heated bed enabled for machine {}", machine);
                image
            }
            _ => {
                debug!("Choosing basic firmware for machine {}", machine);
                tables::base_image(machine).unwrap_or_default()
            }
        },
        MachineFamily::LulzBot => match tables::lulzbot_lcd_image(machine) {
            Some(image) if has_lcd => {
                debug!("Found firmware with LCD for machine {}", machine);
                image
            }
            _ => {
                debug!("Found firmware for machine {}", machine);
                tables::lulzbot_image(machine).unwrap_or_default()
            }
        },
    };

    template.replace(BAUDRATE_PLACEHOLDER, &platform.baud_rate().to_string())
}
