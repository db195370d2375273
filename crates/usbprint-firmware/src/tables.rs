//! Firmware image tables
//!
//! Image names may contain a `{baudrate}` placeholder which the selector
//! fills in for the host. The images themselves live in a separate firmware
//! storage directory.

use crate::machine::MachineId;

/// Placeholder substituted with the host baud rate
pub const BAUDRATE_PLACEHOLDER: &str = "{baudrate}";

/// Base image for machines without hardware variants
pub fn base_image(machine: MachineId) -> Option<&'static str> {
    use MachineId::*;

    match machine {
        BqWitbox => Some("MarlinWitbox.hex"),
        BqHephestos2 => Some("MarlinHephestos2.hex"),
        UltimakerOriginal => Some("MarlinUltimaker-{baudrate}.hex"),
        UltimakerOriginalPlus => Some("MarlinUltimaker-UMOP-{baudrate}.hex"),
        UltimakerOriginalDual => Some("MarlinUltimaker-{baudrate}-dual.hex"),
        Ultimaker2 => Some("MarlinUltimaker2.hex"),
        Ultimaker2Go => Some("MarlinUltimaker2go.hex"),
        Ultimaker2Plus => Some("MarlinUltimaker2plus.hex"),
        Ultimaker2Extended => Some("MarlinUltimaker2extended.hex"),
        Ultimaker2ExtendedPlus => Some("MarlinUltimaker2extended-plus.hex"),
        _ => None,
    }
}

/// Heated-bed build, preferred over the base image when the bed is fitted
pub fn heated_bed_image(machine: MachineId) -> Option<&'static str> {
    match machine {
        MachineId::UltimakerOriginal => Some("MarlinUltimaker-HBK-{baudrate}.hex"),
        MachineId::UltimakerOriginalDual => Some("MarlinUltimaker-HBK-{baudrate}-dual.hex"),
        _ => None,
    }
}

/// Default image for the LulzBot family
pub fn lulzbot_image(machine: MachineId) -> Option<&'static str> {
    use MachineId::*;

    match machine {
        LulzbotMini => Some("Marlin_Mini_SingleExtruder_1.1.5.70_578391eff.hex"),
        LulzbotMiniFlexy => Some("Marlin_Mini_Flexystruder_1.1.5.70_578391eff.hex"),
        LulzbotMiniAerostruder => Some("Marlin_Mini_Aerostruder_1.1.5.70_578391eff.hex"),

        LulzbotTaz5 => Some("Marlin_TAZ5_SingleExtruder_1.1.5.70_578391eff.hex"),
        LulzbotTaz5FlexyV2 => Some("Marlin_TAZ5_Flexystruder_1.1.5.70_578391eff.hex"),
        LulzbotTaz5Moarstruder => Some("Marlin_TAZ5_Moarstruder_1.1.5.70_578391eff.hex"),
        LulzbotTaz5DualV2 => Some("Marlin_TAZ5_DualExtruderV2_1.1.5.70_578391eff.hex"),
        LulzbotTaz5FlexyDuallyV2 => Some("Marlin_TAZ5_FlexyDually_1.1.5.70_578391eff.hex"),
        LulzbotTaz5DualV3 => Some("Marlin_TAZ5_DualExtruderV3_1.1.5.70_578391eff.hex"),
        LulzbotTaz5Aerostruder => Some("Marlin_TAZ5_Aerostruder_1.1.5.70_578391eff.hex"),

        LulzbotTaz6 => Some("Marlin_TAZ6_SingleExtruder_1.1.5.70_578391eff.hex"),
        LulzbotTaz6FlexyV2 => Some("Marlin_TAZ6_Flexystruder_1.1.5.70_578391eff.hex"),
        LulzbotTaz6Moarstruder => Some("Marlin_TAZ6_Moarstruder_1.1.5.70_578391eff.hex"),
        LulzbotTaz6DualV2 => Some("Marlin_TAZ6_DualExtruderV2_1.1.5.70_578391eff.hex"),
        LulzbotTaz6FlexyDuallyV2 => Some("Marlin_TAZ6_FlexyDually_1.1.5.70_578391eff.hex"),
        LulzbotTaz6DualV3 => Some("Marlin_TAZ6_DualExtruderV3_1.1.5.70_578391eff.hex"),
        LulzbotTaz6Aerostruder => Some("Marlin_TAZ6_Aerostruder_1.1.5.70_578391eff.hex"),

        _ => None,
    }
}

/// LCD build for LulzBot machines that have one
pub fn lulzbot_lcd_image(machine: MachineId) -> Option<&'static str> {
    match machine {
        MachineId::LulzbotMini => Some("Marlin_MiniLCD_SingleExtruder_1.1.5.70_578391eff.hex"),
        MachineId::LulzbotMiniFlexy => Some("Marlin_MiniLCD_Flexystruder_1.1.5.70_578391eff.hex"),
        MachineId::LulzbotMiniAerostruder => {
            Some("Marlin_MiniLCD_Aerostruder_1.1.5.70_578391eff.hex")
        }
        _ => None,
    }
}
