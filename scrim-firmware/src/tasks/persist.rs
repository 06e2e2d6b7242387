//! Flash persistence task
//!
//! Writes learned buttons to flash outside the controller's critical
//! section.

use defmt::*;

use scrim_hal_rp2040::flash::FlashStorage;

use crate::channels::PERSIST_CHANNEL;
use crate::config::save_signature;

/// Persist task - owns the flash and writes queued signatures
#[embassy_executor::task]
pub async fn persist_task(mut storage: FlashStorage<'static>) {
    info!("Persist task started");

    loop {
        let (role, signature) = PERSIST_CHANNEL.receive().await;

        if let Err(e) = save_signature(&mut storage, role, &signature).await {
            // The button keeps working until the next power cycle
            error!("Failed to save {:?} button: {:?}", role, e);
        }
    }
}
