//! Configuration types
//!
//! Preset limits and the settings block stored as postcard binary data.

pub mod limits;
pub mod settings;

pub use limits::*;
pub use settings::*;
