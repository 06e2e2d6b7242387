//! Tick clock task
//!
//! Drives the controller's deferred actions. The ticker only runs while
//! the controller has an action pending; between actions the task waits
//! for the next arming and costs nothing.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};

use crate::channels::TICK_ARMED;
use crate::controller::with_controller;

/// Tick task - feeds clock periods into the controller while armed
#[embassy_executor::task]
pub async fn tick_task(period: Duration) {
    info!("Tick task started ({} us period)", period.as_micros());

    let mut ticker = Ticker::every(period);

    loop {
        // Wait for the first arming
        while !TICK_ARMED.wait().await {}
        ticker.reset();
        trace!("Tick clock armed");

        loop {
            match select(ticker.next(), TICK_ARMED.wait()).await {
                Either::First(()) => {
                    if let Some(Some(action)) = with_controller(|c| c.on_tick()) {
                        debug!("Deferred action ran: {:?}", action);
                    }
                }
                // Re-armed with a new action: restart the period
                Either::Second(true) => ticker.reset(),
                Either::Second(false) => break,
            }
        }

        trace!("Tick clock disarmed");
    }
}
