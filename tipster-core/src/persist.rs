//! Preset settings persistence
//!
//! Loads and saves the preset settings block to flash storage.

use tipster_hal::{FlashError, FlashStorage, StorageKey};

use crate::config::PresetSettings;

/// Maximum serialized settings size
pub const MAX_SETTINGS_SIZE: usize = 64;

/// Settings persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Flash operation failed
    Flash(FlashError),
    /// Deserialization failed
    Deserialize,
    /// Serialization failed
    Serialize,
    /// CRC check failed
    CrcMismatch,
    /// Invalid magic or version
    InvalidFormat,
}

impl From<FlashError> for SettingsError {
    fn from(e: FlashError) -> Self {
        SettingsError::Flash(e)
    }
}

/// Load the settings block from flash
///
/// Returns the stored presets, or the factory presets if nothing is stored
/// or the stored block is invalid. Stored values outside the preset range
/// are clamped, which marks the block dirty.
pub async fn load_settings<F: FlashStorage>(storage: &mut F) -> PresetSettings {
    match try_load_settings(storage).await {
        Ok(settings) => {
            #[cfg(feature = "defmt")]
            defmt::info!("Loaded presets from flash: {}", settings.temperatures());
            settings
        }
        Err(SettingsError::Flash(FlashError::NotFound)) => {
            #[cfg(feature = "defmt")]
            defmt::debug!("No presets in flash, using defaults");
            PresetSettings::new()
        }
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Failed to load presets: {}, using defaults", _e);
            PresetSettings::new()
        }
    }
}

/// Load the settings block from flash, reporting why it failed
pub async fn try_load_settings<F: FlashStorage>(
    storage: &mut F,
) -> Result<PresetSettings, SettingsError> {
    let mut buffer = [0u8; MAX_SETTINGS_SIZE];
    let len = storage.read(StorageKey::PresetSettings, &mut buffer).await?;

    #[cfg(feature = "defmt")]
    defmt::debug!("Read {} bytes of presets from flash", len);

    let mut settings: PresetSettings =
        postcard::from_bytes(&buffer[..len]).map_err(|_| SettingsError::Deserialize)?;

    if !settings.is_valid() {
        return Err(SettingsError::InvalidFormat);
    }

    if !settings.verify_crc() {
        return Err(SettingsError::CrcMismatch);
    }

    if settings.sanitize() {
        #[cfg(feature = "defmt")]
        defmt::warn!("Stored presets out of range, clamped");
    }

    Ok(settings)
}

/// Save the settings block to flash
///
/// Updates the CRC before saving and marks the block clean afterwards.
pub async fn save_settings<F: FlashStorage>(
    storage: &mut F,
    settings: &mut PresetSettings,
) -> Result<(), SettingsError> {
    settings.update_crc();

    let mut buffer = [0u8; MAX_SETTINGS_SIZE];
    let bytes =
        postcard::to_slice(settings, &mut buffer).map_err(|_| SettingsError::Serialize)?;

    #[cfg(feature = "defmt")]
    defmt::debug!("Saving {} bytes of presets to flash", bytes.len());

    storage.write(StorageKey::PresetSettings, bytes).await?;
    settings.mark_clean();

    #[cfg(feature = "defmt")]
    defmt::info!("Saved presets to flash: {}", settings.temperatures());

    Ok(())
}

/// Save the settings block only if it changed since the last save
///
/// Returns true if a write happened.
pub async fn save_if_dirty<F: FlashStorage>(
    storage: &mut F,
    settings: &mut PresetSettings,
) -> Result<bool, SettingsError> {
    if !settings.is_dirty() {
        return Ok(false);
    }
    save_settings(storage, settings).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DEFAULT_PRESET_TEMPERATURES, PRESET_TEMPERATURE_MAX, PRESET_TEMPERATURE_MIN,
    };
    use crate::preset::PresetController;
    use crate::traits::{FixedRevision, HwRevision, SettingsStore};
    use embassy_futures::block_on;
    use heapless::Vec;

    /// In-memory flash holding a single key
    #[derive(Default)]
    struct MemoryFlash {
        data: Option<Vec<u8, MAX_SETTINGS_SIZE>>,
        writes: u32,
        fail_writes: bool,
        /// Simulate a record torn by a reset mid-write
        torn: bool,
    }

    impl FlashStorage for MemoryFlash {
        async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
            assert_eq!(key, StorageKey::PresetSettings);
            let data = self.data.as_ref().ok_or(FlashError::NotFound)?;
            if self.torn {
                return Err(FlashError::Corrupted);
            }
            if buffer.len() < data.len() {
                return Err(FlashError::BufferTooSmall);
            }
            buffer[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }

        async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
            assert_eq!(key, StorageKey::PresetSettings);
            if self.fail_writes {
                return Err(FlashError::Flash);
            }
            self.data = Some(Vec::from_slice(data).map_err(|_| FlashError::Full)?);
            self.writes += 1;
            Ok(())
        }

        async fn exists(&mut self, _key: StorageKey) -> bool {
            self.data.is_some()
        }

        async fn erase_all(&mut self) -> Result<(), FlashError> {
            self.data = None;
            Ok(())
        }
    }

    fn store_raw(flash: &mut MemoryFlash, settings: &PresetSettings) {
        let mut buffer = [0u8; MAX_SETTINGS_SIZE];
        let bytes = postcard::to_slice(settings, &mut buffer).unwrap();
        flash.data = Some(Vec::from_slice(bytes).unwrap());
    }

    #[test]
    fn test_load_empty_flash_uses_defaults() {
        let mut flash = MemoryFlash::default();
        assert_eq!(
            block_on(try_load_settings(&mut flash)).unwrap_err(),
            SettingsError::Flash(FlashError::NotFound)
        );

        let settings = block_on(load_settings(&mut flash));
        assert_eq!(settings.temperatures(), &DEFAULT_PRESET_TEMPERATURES);
        assert!(!settings.is_dirty());
    }

    #[test]
    fn test_save_then_load() {
        let mut flash = MemoryFlash::default();
        let mut settings = PresetSettings::new();
        settings.set_preset_temperature(0, 340_000);
        assert!(settings.is_dirty());

        block_on(save_settings(&mut flash, &mut settings)).unwrap();
        assert!(!settings.is_dirty());
        assert!(block_on(flash.exists(StorageKey::PresetSettings)));

        let loaded = block_on(try_load_settings(&mut flash)).unwrap();
        assert_eq!(loaded.temperatures(), &[340_000, DEFAULT_PRESET_TEMPERATURES[1]]);
    }

    #[test]
    fn test_crc_mismatch_rejected() {
        let mut flash = MemoryFlash::default();
        let mut settings = PresetSettings::new();
        settings.update_crc();
        settings.set_preset_temperature(1, 310_000);
        store_raw(&mut flash, &settings);

        assert_eq!(
            block_on(try_load_settings(&mut flash)).unwrap_err(),
            SettingsError::CrcMismatch
        );
        let loaded = block_on(load_settings(&mut flash));
        assert_eq!(loaded.temperatures(), &DEFAULT_PRESET_TEMPERATURES);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let mut flash = MemoryFlash::default();
        let mut settings = PresetSettings::new();
        settings.version = 0;
        settings.update_crc();
        store_raw(&mut flash, &settings);

        assert_eq!(
            block_on(try_load_settings(&mut flash)).unwrap_err(),
            SettingsError::InvalidFormat
        );
    }

    #[test]
    fn test_garbage_rejected() {
        let mut flash = MemoryFlash {
            data: Some(Vec::from_slice(&[0xFF, 0xFF]).unwrap()),
            ..Default::default()
        };
        assert_eq!(
            block_on(try_load_settings(&mut flash)).unwrap_err(),
            SettingsError::Deserialize
        );
    }

    #[test]
    fn test_torn_record_uses_defaults() {
        let mut flash = MemoryFlash::default();
        let mut settings = PresetSettings::with_temperatures([320_000, 380_000]);
        block_on(save_settings(&mut flash, &mut settings)).unwrap();
        flash.torn = true;

        assert_eq!(
            block_on(try_load_settings(&mut flash)).unwrap_err(),
            SettingsError::Flash(FlashError::Corrupted)
        );
        let loaded = block_on(load_settings(&mut flash));
        assert_eq!(loaded.temperatures(), &DEFAULT_PRESET_TEMPERATURES);
        assert!(!loaded.is_dirty());
    }

    #[test]
    fn test_out_of_range_block_is_clamped() {
        let mut flash = MemoryFlash::default();
        let mut settings = PresetSettings::with_temperatures([0, 600_000]);
        settings.update_crc();
        store_raw(&mut flash, &settings);

        let loaded = block_on(load_settings(&mut flash));
        assert_eq!(
            loaded.temperatures(),
            &[PRESET_TEMPERATURE_MIN, PRESET_TEMPERATURE_MAX]
        );
        assert!(loaded.is_dirty());
    }

    #[test]
    fn test_save_if_dirty() {
        let mut flash = MemoryFlash::default();
        let mut settings = PresetSettings::new();

        assert!(!block_on(save_if_dirty(&mut flash, &mut settings)).unwrap());
        assert_eq!(flash.writes, 0);

        settings.set_preset_temperature(1, 305_000);
        assert!(block_on(save_if_dirty(&mut flash, &mut settings)).unwrap());
        assert!(!block_on(save_if_dirty(&mut flash, &mut settings)).unwrap());
        assert_eq!(flash.writes, 1);
    }

    #[test]
    fn test_failed_write_keeps_dirty() {
        let mut flash = MemoryFlash {
            fail_writes: true,
            ..Default::default()
        };
        let mut settings = PresetSettings::new();
        settings.set_preset_temperature(0, 270_000);

        assert_eq!(
            block_on(save_settings(&mut flash, &mut settings)).unwrap_err(),
            SettingsError::Flash(FlashError::Flash)
        );
        assert!(settings.is_dirty());
    }

    #[test]
    fn test_edit_session_persisted() {
        let mut flash = MemoryFlash::default();
        let mut settings = block_on(load_settings(&mut flash));

        let mut presets =
            PresetController::new(&mut settings, FixedRevision(HwRevision::LegacyReducedRange));
        presets.edit_select(1);
        presets.edit_add(200_000);
        presets.edit_end();
        block_on(save_if_dirty(&mut flash, presets.settings_mut())).unwrap();
        drop(presets);

        let reloaded = block_on(load_settings(&mut flash));
        assert_eq!(reloaded.get_preset_temperature(1), 400_000);
    }

    #[test]
    fn test_erase_all_restores_defaults() {
        let mut flash = MemoryFlash::default();
        let mut settings = PresetSettings::with_temperatures([260_000, 360_000]);
        block_on(save_settings(&mut flash, &mut settings)).unwrap();

        block_on(flash.erase_all()).unwrap();
        let loaded = block_on(load_settings(&mut flash));
        assert_eq!(loaded.temperatures(), &DEFAULT_PRESET_TEMPERATURES);
    }
}
