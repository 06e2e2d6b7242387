//! IR receiver task
//!
//! Times the edges of a demodulating receiver (active low, e.g. TSOP38238)
//! and feeds them to the NEC decoder. Decoded buttons go to the controller
//! task.
//!
//! The first falling edge after the wake latch was armed also wakes the
//! controller. That edge is the start of a frame and is decoded as usual.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use scrim_core::decoder::NecDecoder;

use crate::channels::{SIGNAL_CHANNEL, WAKE, WAKE_LATCH};

/// Longest edge interval worth measuring; anything longer is idle line
const MAX_INTERVAL_US: u64 = u32::MAX as u64;

/// IR task - decodes remote frames
#[embassy_executor::task]
pub async fn ir_task(mut receiver: Input<'static>) {
    info!("IR task started");

    let mut decoder = NecDecoder::new();
    let mut last_edge = Instant::now();

    loop {
        receiver.wait_for_any_edge().await;

        let now = Instant::now();
        let elapsed_us = now.duration_since(last_edge).as_micros().min(MAX_INTERVAL_US) as u32;
        last_edge = now;

        let low = receiver.is_low();

        if low && WAKE_LATCH.fire() {
            debug!("IR activity, waking controller");
            // Repeat codes after a sleep must not replay the last button
            decoder.forget();
            WAKE.signal(());
        }

        if let Some(frame) = decoder.feed(low, elapsed_us) {
            let signature = frame.signature;
            debug!(
                "IR frame: address={=u16:#x} command={=u16:#x} repeat={}",
                signature.address, signature.command, frame.repeat
            );

            if SIGNAL_CHANNEL.try_send(signature).is_err() {
                warn!("Signal channel full, dropping IR frame");
            }
        }
    }
}
