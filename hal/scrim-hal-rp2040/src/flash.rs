//! Flash storage driver for RP2040
//!
//! Uses sequential-storage for wear-leveled key-value storage
//! in the last 64KB of flash.
//!
//! Implements the `FlashStorage` trait from `scrim-hal`.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

// Re-export shared types from scrim-hal
pub use scrim_hal::flash::{FlashError, StorageKey};

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const DATA_PARTITION_SIZE: usize = 64 * 1024; // 64KB for learned buttons
pub const DATA_PARTITION_START: usize = FLASH_SIZE - DATA_PARTITION_SIZE;

/// Flash range for the data partition
pub const DATA_RANGE: core::ops::Range<u32> = (DATA_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch buffer for one map item (key byte, record, item header)
const ITEM_BUFFER_SIZE: usize = 64;

/// RP2040 Flash storage implementation
///
/// Every write appends a new item, so rewriting a button cycles through
/// the partition instead of erasing the same sector each time.
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStorage<'d> {
    /// Create a new flash storage instance
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }
}

impl<'d> scrim_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut data_buffer = [0u8; ITEM_BUFFER_SIZE];

        let result = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            DATA_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                let len = data.len();
                if buffer.len() < len {
                    return Err(FlashError::BufferTooSmall);
                }
                buffer[..len].copy_from_slice(data);
                Ok(len)
            }
            Ok(None) => Err(FlashError::NotFound),
            Err(sequential_storage::Error::Storage { .. }) => Err(FlashError::Flash),
            Err(sequential_storage::Error::Corrupted { .. }) => Err(FlashError::Corrupted),
            Err(_) => Err(FlashError::Storage),
        }
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        let mut data_buffer = [0u8; ITEM_BUFFER_SIZE];

        map::store_item(
            &mut self.flash,
            DATA_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &key,
            &data,
        )
        .await
        .map_err(|e| match e {
            sequential_storage::Error::Storage { .. } => FlashError::Flash,
            sequential_storage::Error::FullStorage => FlashError::Full,
            _ => FlashError::Storage,
        })
    }
}

/// Type alias used by the firmware
pub type FlashStorage<'d> = Rp2040FlashStorage<'d>;
