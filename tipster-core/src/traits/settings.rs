//! Preset temperature storage trait

/// Storage for preset temperatures
///
/// Temperatures are in thousandths of a degree Celsius (m°C). The store owns
/// the values; consumers never cache them. A write must be visible to the
/// next read. Surviving power loss is up to the implementation.
pub trait SettingsStore {
    /// Read the stored temperature for a preset
    fn get_preset_temperature(&self, index: u8) -> i32;

    /// Store a new temperature for a preset
    fn set_preset_temperature(&mut self, index: u8, value: i32);
}

impl<T: SettingsStore + ?Sized> SettingsStore for &mut T {
    fn get_preset_temperature(&self, index: u8) -> i32 {
        (**self).get_preset_temperature(index)
    }

    fn set_preset_temperature(&mut self, index: u8, value: i32) {
        (**self).set_preset_temperature(index, value)
    }
}
