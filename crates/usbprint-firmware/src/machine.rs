//! Machine definition identifiers
//!
//! The identifiers are the ids of the printer machine definitions, e.g.
//! `ultimaker_original`. Only machines that ship a flashable firmware image
//! are listed; every other id is rejected at parse time.

use std::fmt;
use std::str::FromStr;

use crate::error::FirmwareError;

/// Machine definition with a known firmware image
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MachineId {
    BqWitbox,
    BqHephestos2,
    UltimakerOriginal,
    UltimakerOriginalPlus,
    UltimakerOriginalDual,
    Ultimaker2,
    Ultimaker2Go,
    Ultimaker2Plus,
    Ultimaker2Extended,
    Ultimaker2ExtendedPlus,
    LulzbotMini,
    LulzbotMiniFlexy,
    LulzbotMiniAerostruder,
    LulzbotTaz5,
    LulzbotTaz5FlexyV2,
    LulzbotTaz5Moarstruder,
    LulzbotTaz5DualV2,
    LulzbotTaz5FlexyDuallyV2,
    LulzbotTaz5DualV3,
    LulzbotTaz5Aerostruder,
    LulzbotTaz6,
    LulzbotTaz6FlexyV2,
    LulzbotTaz6Moarstruder,
    LulzbotTaz6DualV2,
    LulzbotTaz6FlexyDuallyV2,
    LulzbotTaz6DualV3,
    LulzbotTaz6Aerostruder,
}

/// Grouping that decides which firmware tables apply to a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineFamily {
    /// One base image, optionally replaced by a heated-bed build
    Standard,
    /// Extended-hardware family with per-toolhead images and LCD builds
    LulzBot,
}

impl MachineId {
    /// Every known machine
    pub const ALL: &'static [MachineId] = &[
        MachineId::BqWitbox,
        MachineId::BqHephestos2,
        MachineId::UltimakerOriginal,
        MachineId::UltimakerOriginalPlus,
        MachineId::UltimakerOriginalDual,
        MachineId::Ultimaker2,
        MachineId::Ultimaker2Go,
        MachineId::Ultimaker2Plus,
        MachineId::Ultimaker2Extended,
        MachineId::Ultimaker2ExtendedPlus,
        MachineId::LulzbotMini,
        MachineId::LulzbotMiniFlexy,
        MachineId::LulzbotMiniAerostruder,
        MachineId::LulzbotTaz5,
        MachineId::LulzbotTaz5FlexyV2,
        MachineId::LulzbotTaz5Moarstruder,
        MachineId::LulzbotTaz5DualV2,
        MachineId::LulzbotTaz5FlexyDuallyV2,
        MachineId::LulzbotTaz5DualV3,
        MachineId::LulzbotTaz5Aerostruder,
        MachineId::LulzbotTaz6,
        MachineId::LulzbotTaz6FlexyV2,
        MachineId::LulzbotTaz6Moarstruder,
        MachineId::LulzbotTaz6DualV2,
        MachineId::LulzbotTaz6FlexyDuallyV2,
        MachineId::LulzbotTaz6DualV3,
        MachineId::LulzbotTaz6Aerostruder,
    ];

    /// Get the machine definition id
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BqWitbox => "bq_witbox",
            Self::BqHephestos2 => "bq_hephestos_2",
            Self::UltimakerOriginal => "ultimaker_original",
            Self::UltimakerOriginalPlus => "ultimaker_original_plus",
            Self::UltimakerOriginalDual => "ultimaker_original_dual",
            Self::Ultimaker2 => "ultimaker2",
            Self::Ultimaker2Go => "ultimaker2_go",
            Self::Ultimaker2Plus => "ultimaker2_plus",
            Self::Ultimaker2Extended => "ultimaker2_extended",
            Self::Ultimaker2ExtendedPlus => "ultimaker2_extended_plus",
            Self::LulzbotMini => "lulzbot_mini",
            Self::LulzbotMiniFlexy => "lulzbot_mini_flexy",
            Self::LulzbotMiniAerostruder => "lulzbot_mini_aerostruder",
            Self::LulzbotTaz5 => "lulzbot_taz5",
            Self::LulzbotTaz5FlexyV2 => "lulzbot_taz5_flexy_v2",
            Self::LulzbotTaz5Moarstruder => "lulzbot_taz5_moarstruder",
            Self::LulzbotTaz5DualV2 => "lulzbot_taz5_dual_v2",
            Self::LulzbotTaz5FlexyDuallyV2 => "lulzbot_taz5_flexy_dually_v2",
            Self::LulzbotTaz5DualV3 => "lulzbot_taz5_dual_v3",
            Self::LulzbotTaz5Aerostruder => "lulzbot_taz5_aerostruder",
            Self::LulzbotTaz6 => "lulzbot_taz6",
            Self::LulzbotTaz6FlexyV2 => "lulzbot_taz6_flexy_v2",
            Self::LulzbotTaz6Moarstruder => "lulzbot_taz6_moarstruder",
            Self::LulzbotTaz6DualV2 => "lulzbot_taz6_dual_v2",
            Self::LulzbotTaz6FlexyDuallyV2 => "lulzbot_taz6_flexy_dually_v2",
            Self::LulzbotTaz6DualV3 => "lulzbot_taz6_dual_v3",
            Self::LulzbotTaz6Aerostruder => "lulzbot_taz6_aerostruder",
        }
    }

    /// Get the firmware family of this machine
    pub fn family(&self) -> MachineFamily {
        match self {
            Self::BqWitbox
            | Self::BqHephestos2
            | Self::UltimakerOriginal
            | Self::UltimakerOriginalPlus
            | Self::UltimakerOriginalDual
            | Self::Ultimaker2
            | Self::Ultimaker2Go
            | Self::Ultimaker2Plus
            | Self::Ultimaker2Extended
            | Self::Ultimaker2ExtendedPlus => MachineFamily::Standard,
            Self::LulzbotMini
            | Self::LulzbotMiniFlexy
            | Self::LulzbotMiniAerostruder
            | Self::LulzbotTaz5
            | Self::LulzbotTaz5FlexyV2
            | Self::LulzbotTaz5Moarstruder
            | Self::LulzbotTaz5DualV2
            | Self::LulzbotTaz5FlexyDuallyV2
            | Self::LulzbotTaz5DualV3
            | Self::LulzbotTaz5Aerostruder
            | Self::LulzbotTaz6
            | Self::LulzbotTaz6FlexyV2
            | Self::LulzbotTaz6Moarstruder
            | Self::LulzbotTaz6DualV2
            | Self::LulzbotTaz6FlexyDuallyV2
            | Self::LulzbotTaz6DualV3
            | Self::LulzbotTaz6Aerostruder => MachineFamily::LulzBot,
        }
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineId {
    type Err = FirmwareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| FirmwareError::UnknownMachine(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_ids() {
        for machine in MachineId::ALL {
            assert_eq!(machine.as_str().parse::<MachineId>().unwrap(), *machine);
        }
    }

    #[test]
    fn test_parse_unknown_id() {
        let err = "unknown_machine_x".parse::<MachineId>().unwrap_err();
        assert!(matches!(err, FirmwareError::UnknownMachine(ref id) if id == "unknown_machine_x"));
        assert!("".parse::<MachineId>().is_err());
        assert!("Ultimaker_Original".parse::<MachineId>().is_err());
    }

    #[test]
    fn test_families() {
        assert_eq!(MachineId::Ultimaker2Go.family(), MachineFamily::Standard);
        assert_eq!(MachineId::LulzbotTaz6DualV3.family(), MachineFamily::LulzBot);
        assert_eq!(
            MachineId::ALL
                .iter()
                .filter(|m| m.family() == MachineFamily::LulzBot)
                .count(),
            17
        );
    }
}
