//! Preset limits
//!
//! Temperatures are in thousandths of a degree Celsius (m°C).

/// Number of temperature presets
pub const PRESET_COUNT: usize = 2;

/// Lowest temperature a preset can be edited down to
pub const PRESET_TEMPERATURE_MIN: i32 = 50 * 1000;

/// Highest preset temperature on standard hardware
pub const PRESET_TEMPERATURE_MAX: i32 = 500 * 1000;

/// Highest preset temperature on legacy reduced-range hardware
pub const PRESET_TEMPERATURE_MAX_LEGACY: i32 = 400 * 1000;

/// Factory preset temperatures, used when flash holds no valid block
pub const DEFAULT_PRESET_TEMPERATURES: [i32; PRESET_COUNT] = [250 * 1000, 300 * 1000];

/// Check whether a preset index addresses an existing preset
pub const fn is_valid_preset(index: u8) -> bool {
    (index as usize) < PRESET_COUNT
}
