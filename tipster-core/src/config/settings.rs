//! Preset settings block
//!
//! Holds the preset temperatures in RAM and is persisted to flash using
//! postcard. This is the default [`SettingsStore`] for the firmware.

use serde::{Deserialize, Serialize};

use super::limits::{
    is_valid_preset, DEFAULT_PRESET_TEMPERATURES, PRESET_COUNT, PRESET_TEMPERATURE_MAX,
    PRESET_TEMPERATURE_MIN,
};
use crate::traits::SettingsStore;

/// Magic number to identify a valid settings block
pub const SETTINGS_MAGIC: u32 = 0x50525354; // "PRST"

/// Current settings block version
pub const SETTINGS_VERSION: u8 = 1;

/// Preset temperatures with a header for validation
///
/// Out-of-range preset indices read as 0 and writes to them are dropped,
/// matching the fail-soft contract of the preset controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PresetSettings {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Preset temperatures (m°C)
    temperatures: [i32; PRESET_COUNT],
    /// CRC32 checksum (calculated over magic..temperatures)
    pub crc: u32,
    /// Modified since last save
    #[serde(skip)]
    dirty: bool,
}

impl Default for PresetSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetSettings {
    /// Create a block holding the factory presets
    pub const fn new() -> Self {
        Self::with_temperatures(DEFAULT_PRESET_TEMPERATURES)
    }

    /// Create a block holding the given preset temperatures
    pub const fn with_temperatures(temperatures: [i32; PRESET_COUNT]) -> Self {
        Self {
            magic: SETTINGS_MAGIC,
            version: SETTINGS_VERSION,
            temperatures,
            crc: 0,
            dirty: false,
        }
    }

    /// All preset temperatures (m°C)
    pub fn temperatures(&self) -> &[i32; PRESET_COUNT] {
        &self.temperatures
    }

    /// Check if the header is valid (magic and version match)
    pub fn is_valid(&self) -> bool {
        self.magic == SETTINGS_MAGIC && self.version == SETTINGS_VERSION
    }

    /// Check if any preset changed since the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the block as saved
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Clamp every preset into the absolute preset range
    ///
    /// Revision-specific maxima are enforced when editing, not here.
    /// Returns true if any value changed.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;
        for temp in &mut self.temperatures {
            let clamped = (*temp).clamp(PRESET_TEMPERATURE_MIN, PRESET_TEMPERATURE_MAX);
            if clamped != *temp {
                *temp = clamped;
                changed = true;
            }
        }
        self.dirty |= changed;
        changed
    }

    /// Calculate CRC32 for the data (excluding the crc field itself)
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFFFFFF;

        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &[self.version]);
        for temp in &self.temperatures {
            crc = crc32_update(crc, &temp.to_le_bytes());
        }

        !crc
    }

    /// Update the CRC field
    pub fn update_crc(&mut self) {
        self.crc = self.calculate_crc();
    }

    /// Verify the CRC is correct
    pub fn verify_crc(&self) -> bool {
        self.crc == self.calculate_crc()
    }
}

impl SettingsStore for PresetSettings {
    fn get_preset_temperature(&self, index: u8) -> i32 {
        if !is_valid_preset(index) {
            return 0;
        }
        self.temperatures[index as usize]
    }

    fn set_preset_temperature(&mut self, index: u8, value: i32) {
        if !is_valid_preset(index) {
            return;
        }
        let slot = &mut self.temperatures[index as usize];
        if *slot != value {
            *slot = value;
            self.dirty = true;
        }
    }
}

/// CRC32 update (IEEE 802.3 polynomial)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB88320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}
