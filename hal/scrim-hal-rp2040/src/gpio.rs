//! GPIO outputs for relays and the activity indicator
//!
//! Wraps embassy-rp outputs so they can be driven through the
//! `scrim_hal::OutputPin` trait and its polarity adapter.

use embassy_rp::gpio::{Level, Output, Pin};
use embassy_rp::Peri;
use scrim_hal::{OutputPin, Polarity, PolarizedOutput};

/// RP2040 push-pull output
pub struct Rp2040Output<'d> {
    pin: Output<'d>,
}

impl<'d> Rp2040Output<'d> {
    /// Configure a pin as output, starting at the level that means "inactive"
    pub fn new(pin: Peri<'d, impl Pin>, polarity: Polarity) -> Self {
        let initial = if polarity.level_for(false) {
            Level::High
        } else {
            Level::Low
        };
        Self {
            pin: Output::new(pin, initial),
        }
    }
}

impl OutputPin for Rp2040Output<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Relay or LED output addressed by logical activation
pub type LogicalOutput<'d> = PolarizedOutput<Rp2040Output<'d>>;

/// Create a logical output that starts deactivated
pub fn logical_output<'d>(pin: Peri<'d, impl Pin>, polarity: Polarity) -> LogicalOutput<'d> {
    PolarizedOutput::new(Rp2040Output::new(pin, polarity), polarity)
}
