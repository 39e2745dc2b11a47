//! Flash storage abstractions
//!
//! Persisted records are addressed by a one-byte [`StorageKey`]. Board
//! flash drivers implement [`FlashStorage`] on top of whatever wear-leveling
//! scheme their chip needs.

/// Record keys in the settings partition
///
/// The discriminant is the byte written to flash, so existing variants must
/// keep their value. Append new keys at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Preset temperature block (binary postcard format)
    PresetSettings = 0,
}

impl StorageKey {
    /// Key byte as written to flash
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Key for a byte read back from flash
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::PresetSettings),
            _ => None,
        }
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Low-level program or erase failed
    Flash,
    /// No record stored under the key
    NotFound,
    /// Record does not fit the caller's buffer
    BufferTooSmall,
    /// Record was cut short or failed its integrity check
    Corrupted,
    /// No space left in the partition
    Full,
}

/// Persistent key-value storage for settings records
///
/// A successful `write` must be returned by the next `read` of the same key,
/// including after a reset. A record interrupted mid-write should read back
/// as [`FlashError::Corrupted`] or as the previous record, never as a
/// partial one.
pub trait FlashStorage {
    /// Read the record for `key` into `buffer`, returning its length
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, FlashError>>;

    /// Replace the record for `key`
    fn write(
        &mut self,
        key: StorageKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;

    /// Check whether a record exists for `key`
    fn exists(&mut self, key: StorageKey) -> impl core::future::Future<Output = bool>;

    /// Erase the whole settings partition, presets included
    fn erase_all(&mut self) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

#[cfg(feature = "sequential-storage")]
mod map_key {
    use super::StorageKey;
    use sequential_storage::map::{Key, SerializationError};

    /// Keys are stored as their single discriminant byte
    impl Key for StorageKey {
        fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
            let slot = buffer
                .first_mut()
                .ok_or(SerializationError::BufferTooSmall)?;
            *slot = self.as_u8();
            Ok(1)
        }

        fn deserialize_from(buffer: &[u8]) -> Result<(Self, usize), SerializationError> {
            let byte = *buffer.first().ok_or(SerializationError::BufferTooSmall)?;
            let key = StorageKey::from_u8(byte).ok_or(SerializationError::InvalidFormat)?;
            Ok((key, 1))
        }
    }

}
