//! Preset controller
//!
//! Two independent axes of state:
//!
//! - Standby axis: `Standby` (initial) or `Active`. Selecting a valid preset
//!   activates; `set_standby` returns to standby from anywhere.
//! - Edit axis: no session (initial) or editing one preset. `edit_select`
//!   opens a session, `edit_end` closes it.
//!
//! Invalid preset indices and edits without a session are ignored. The
//! controller is polled from the control loop every tick and has no error
//! path.

use crate::config::{is_valid_preset, PRESET_TEMPERATURE_MIN};
use crate::traits::{HardwareInfo, SettingsStore};

/// Standby axis state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// No active heating target
    #[default]
    Standby,
    /// Heating to the selected preset
    Active,
}

/// Preset selection, standby and edit state
///
/// Preset temperatures are never cached here; every read and write goes
/// through the settings store.
pub struct PresetController<S, H> {
    settings: S,
    hardware: H,
    selected: u8,
    edited: Option<u8>,
    mode: Mode,
}

impl<S: SettingsStore, H: HardwareInfo> PresetController<S, H> {
    /// Create a controller in standby with preset 0 selected
    pub fn new(settings: S, hardware: H) -> Self {
        Self {
            settings,
            hardware,
            selected: 0,
            edited: None,
            mode: Mode::Standby,
        }
    }

    /// Enter standby mode
    pub fn set_standby(&mut self) {
        if self.mode != Mode::Standby {
            #[cfg(feature = "defmt")]
            defmt::debug!("Entering standby");
        }
        self.mode = Mode::Standby;
    }

    /// Check if in standby mode
    pub fn is_standby(&self) -> bool {
        self.mode == Mode::Standby
    }

    /// Current standby axis state
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Select the active preset and leave standby
    ///
    /// Out-of-range presets are ignored.
    pub fn select(&mut self, preset: u8) {
        if !is_valid_preset(preset) {
            return;
        }
        self.selected = preset;
        self.mode = Mode::Active;

        #[cfg(feature = "defmt")]
        defmt::debug!("Preset {} selected", preset);
    }

    /// Open a preset for editing
    ///
    /// Out-of-range presets are ignored and leave any open session as is.
    pub fn edit_select(&mut self, preset: u8) {
        if !is_valid_preset(preset) {
            return;
        }
        self.edited = Some(preset);

        #[cfg(feature = "defmt")]
        defmt::debug!("Editing preset {}", preset);
    }

    /// Close the edit session
    pub fn edit_end(&mut self) {
        #[cfg(feature = "defmt")]
        if let Some(preset) = self.edited {
            defmt::debug!("Finished editing preset {}", preset);
        }

        self.edited = None;
    }

    /// Read the operating temperature (m°C)
    ///
    /// Returns 0 in standby.
    pub fn get_temperature(&self) -> i32 {
        self.target_temperature().unwrap_or(0)
    }

    /// Read the operating temperature, `None` in standby
    pub fn target_temperature(&self) -> Option<i32> {
        match self.mode {
            Mode::Standby => None,
            Mode::Active => Some(self.settings.get_preset_temperature(self.selected)),
        }
    }

    /// Read a preset temperature (m°C)
    ///
    /// Returns 0 for out-of-range presets. Callers that need to tell that
    /// apart from a stored 0 should use [`Self::preset`].
    pub fn get_preset(&self, preset: u8) -> i32 {
        self.preset(preset).unwrap_or(0)
    }

    /// Read a preset temperature, `None` for out-of-range presets
    pub fn preset(&self, preset: u8) -> Option<i32> {
        if !is_valid_preset(preset) {
            return None;
        }
        Some(self.settings.get_preset_temperature(preset))
    }

    /// Read the selected preset
    pub fn get_selected(&self) -> u8 {
        self.selected
    }

    /// Read the edited preset, `None` when no session is open
    pub fn get_edited(&self) -> Option<u8> {
        self.edited
    }

    /// Check if an edit session is open
    pub fn is_editing(&self) -> bool {
        self.edited.is_some()
    }

    /// Check if the given preset is being edited
    pub fn is_editing_preset(&self, preset: u8) -> bool {
        self.edited == Some(preset)
    }

    /// Add to the edited preset temperature
    ///
    /// `val` is positive to raise, negative to lower (m°C). The result is
    /// clamped between the preset minimum and the maximum of the detected
    /// hardware revision. Does nothing without an open session.
    pub fn edit_add(&mut self, val: i32) {
        let Some(preset) = self.edited else {
            return;
        };

        let max_temp = self
            .hardware
            .get_hardware_revision()
            .max_preset_temperature();
        let current = self.settings.get_preset_temperature(preset);
        let value = current
            .saturating_add(val)
            .clamp(PRESET_TEMPERATURE_MIN, max_temp);
        self.settings.set_preset_temperature(preset, value);

        #[cfg(feature = "defmt")]
        defmt::trace!("Preset {}: {} -> {}", preset, current, value);
    }

    /// Get access to the settings store
    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Get mutable access to the settings store
    pub fn settings_mut(&mut self) -> &mut S {
        &mut self.settings
    }

    /// Get access to the hardware info
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Release the collaborators
    pub fn into_parts(self) -> (S, H) {
        (self.settings, self.hardware)
    }
}
