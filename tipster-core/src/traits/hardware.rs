//! Hardware revision detection

use crate::config::{PRESET_TEMPERATURE_MAX, PRESET_TEMPERATURE_MAX_LEGACY};

/// Board hardware revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HwRevision {
    /// Current boards with the full heater range
    #[default]
    Standard,
    /// Early boards whose heater stage is limited to a lower maximum
    LegacyReducedRange,
}

impl HwRevision {
    /// Highest preset temperature this revision may be set to (m°C)
    pub const fn max_preset_temperature(self) -> i32 {
        match self {
            HwRevision::Standard => PRESET_TEMPERATURE_MAX,
            HwRevision::LegacyReducedRange => PRESET_TEMPERATURE_MAX_LEGACY,
        }
    }
}

/// Source of the board hardware revision
///
/// Queried at edit time. The revision must not change during a run.
pub trait HardwareInfo {
    /// Get the detected hardware revision
    fn get_hardware_revision(&self) -> HwRevision;
}

impl<T: HardwareInfo + ?Sized> HardwareInfo for &T {
    fn get_hardware_revision(&self) -> HwRevision {
        (**self).get_hardware_revision()
    }
}

/// Hardware info that always reports the same revision
///
/// Boards detect their revision once at boot and hand this to the
/// controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedRevision(pub HwRevision);

impl HardwareInfo for FixedRevision {
    fn get_hardware_revision(&self) -> HwRevision {
        self.0
    }
}
