//! Main controller task
//!
//! Waits for decoded signals, reads the potentiometer for each one, and
//! runs one controller iteration per signal or poll interval. Also carries
//! out sleep requests by parking until the IR task reports activity.

use defmt::*;
use embassy_time::{with_timeout, Duration};

use scrim_core::motion::SignalOutcome;
use scrim_core::sensor::PotentiometerReading;
use scrim_core::ControllerError;
use scrim_hal_rp2040::adc::Potentiometer;

use crate::channels::{SIGNAL_CHANNEL, SLEEP_REQUEST, WAKE, WAKE_LATCH};
use crate::controller::with_controller;

/// Longest wait for a signal before an idle iteration
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Controller task - main loop
#[embassy_executor::task]
pub async fn controller_task(mut potentiometer: Potentiometer<'static>) {
    info!("Controller task started");

    loop {
        let received = with_timeout(POLL_INTERVAL, SIGNAL_CHANNEL.receive()).await.ok();

        // EnterSleep runs in the tick task while this task waits above, so
        // the request is checked before another idle iteration
        if SLEEP_REQUEST.try_take().is_some() {
            if received.is_none() {
                info!("Idle, sleeping until IR activity");
                WAKE.wait().await;
            } else {
                // A frame arrived together with the halt; treat it as the wake
                WAKE_LATCH.disarm();
                WAKE.reset();
            }
            SLEEP_REQUEST.reset();
            with_controller(|c| c.wake());
            info!("Woke up");
            if received.is_none() {
                continue;
            }
        }

        let input = match received {
            Some(signature) => match potentiometer.read_counts().await {
                Ok(counts) => Some((signature, PotentiometerReading::new(counts))),
                Err(e) => {
                    warn!("Potentiometer read failed: {:?}, ignoring signal", e);
                    continue;
                }
            },
            None => None,
        };

        let poti = input.map(|(_, poti)| poti);
        if let Some(Some(result)) = with_controller(|c| c.poll(input)) {
            log_outcome(result, poti);
        }
    }
}

fn log_outcome(
    result: Result<SignalOutcome, ControllerError>,
    poti: Option<PotentiometerReading>,
) {
    let counts = poti.map(|p| p.counts()).unwrap_or_default();

    match result {
        Ok(SignalOutcome::Learned(role)) => info!("Learned {:?} button (poti={})", role, counts),
        Ok(SignalOutcome::RaiseStarted { ticks }) => info!("Raising for {} ticks", ticks),
        Ok(SignalOutcome::LowerStarted { full: true, ticks }) => {
            info!("Lowering for {} ticks (poti={})", ticks, counts)
        }
        Ok(SignalOutcome::LowerStarted { full: false, ticks }) => {
            info!("Lowering a step of {} ticks", ticks)
        }
        Ok(SignalOutcome::Aborted(action)) => info!("Aborted motion ending in {:?}", action),
        Ok(SignalOutcome::Ignored(reason)) => debug!("Signal ignored: {:?}", reason),
        Err(ControllerError::Store(e)) => {
            warn!("Learned button not persisted: {:?}", e)
        }
    }
}
