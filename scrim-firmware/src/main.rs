//! Scrim - Projection Screen Controller Firmware
//!
//! Main firmware binary for RP2040-based boards driving a motorized
//! projection screen through two relays, learned from any NEC remote.
//!
//! Board wiring (Raspberry Pi Pico):
//!
//! | Function          | Pin    |
//! |-------------------|--------|
//! | IR receiver       | GPIO2  |
//! | Raise relay       | GPIO14 |
//! | Lower relay       | GPIO15 |
//! | Activity LED      | GPIO25 |
//! | Potentiometer     | GPIO26 (ADC0) |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_time::Duration;
use {defmt_rtt as _, panic_probe as _};

use scrim_core::config::ControllerConfig;
use scrim_core::ScreenController;
use scrim_hal::Polarity;
use scrim_hal_rp2040::adc::Potentiometer;
use scrim_hal_rp2040::flash::FlashStorage;
use scrim_hal_rp2040::gpio::logical_output;

use crate::config::{load_signatures, parse_config, ScreenConfig};
use crate::controller::{FlashSignatureStore, RelayOutputs, SignalTickClock, SleepControl};

/// Embedded configuration (compiled into firmware)
/// Edit screen.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../screen.toml");

mod channels;
mod config;
mod controller;
mod tasks;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Scrim firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Relays are released as soon as their pins are configured
    let relay_polarity = polarity(config.outputs.relays_active_low);
    let outputs = RelayOutputs::new(
        logical_output(p.PIN_14, relay_polarity),
        logical_output(p.PIN_15, relay_polarity),
        logical_output(p.PIN_25, polarity(config.outputs.indicator_active_low)),
    );
    info!("Outputs initialized, relays released");

    // Learned buttons are read once; later writes go through the persist task
    let mut storage = FlashStorage::new(p.FLASH, p.DMA_CH0);
    let snapshot = load_signatures(&mut storage).await;

    let mut screen = ScreenController::new(
        config.controller,
        outputs,
        FlashSignatureStore::new(snapshot),
        SignalTickClock,
        SleepControl,
    );
    let report = screen.load_buttons();
    if !report.fully_learned() {
        warn!(
            "Remote not fully learned: turn the potentiometer below {} and press a button",
            config.controller.programming_threshold
        );
    }
    controller::install(screen);

    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let wiper = Channel::new_pin(p.PIN_26, Pull::None);
    let potentiometer = Potentiometer::new(adc, wiper);
    info!("ADC initialized");

    // Receiver output idles high
    let receiver = Input::new(p.PIN_2, Pull::Up);

    let tick_period = Duration::from_micros(config.controller.tick_period_us());

    // Spawn tasks
    spawner.spawn(tasks::tick_task(tick_period)).unwrap();
    spawner.spawn(tasks::ir_task(receiver)).unwrap();
    spawner.spawn(tasks::persist_task(storage)).unwrap();
    spawner.spawn(tasks::controller_task(potentiometer)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse and validate the embedded configuration
///
/// Falls back to the built-in defaults if `screen.toml` is unusable.
fn load_config() -> ScreenConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            // The build script validates screen.toml, so this means the
            // two parsers disagree
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            return ScreenConfig::default();
        }
    };

    if let Err(e) = config.controller.validate() {
        error!("Invalid controller configuration: {:?}", e);
        error!("Using default controller configuration");
        return ScreenConfig {
            controller: ControllerConfig::default(),
            ..config
        };
    }

    let c = &config.controller;
    info!("Configuration loaded");
    debug!(
        "  tick rate {} Hz, full travel {} s, step {} s, idle {} s",
        c.tick_rate_hz, c.full_travel_seconds, c.lower_step_seconds, c.idle_timeout_seconds
    );
    debug!(
        "  learning below {}, lower button below {}",
        c.programming_threshold, c.programming_lower_threshold
    );
    config
}

fn polarity(active_low: bool) -> Polarity {
    if active_low {
        Polarity::ActiveLow
    } else {
        Polarity::ActiveHigh
    }
}
