//! Temperature preset selection and editing
//!
//! Tracks which preset drives the heater, whether the tool is in standby,
//! and which preset (if any) is open for adjustment.

pub mod controller;

pub use controller::{Mode, PresetController};
