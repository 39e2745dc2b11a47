//! Board-agnostic core logic for the soldering station firmware
//!
//! This crate contains the application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (settings store, hardware revision)
//! - Preset controller (selection, standby, bounded editing)
//! - Preset settings block and its limits
//! - Flash persistence of the settings block

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod persist;
pub mod preset;
pub mod traits;
