//! Collaborator traits
//!
//! These traits define the interface between the preset logic and the
//! board-specific pieces it depends on.

pub mod hardware;
pub mod settings;

pub use hardware::{FixedRevision, HardwareInfo, HwRevision};
pub use settings::SettingsStore;
