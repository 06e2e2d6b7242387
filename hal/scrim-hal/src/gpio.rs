//! GPIO pin abstractions
//!
//! Provides the digital output trait implemented by chip-specific HALs,
//! plus a polarity wrapper so relay boards that switch on a low level can
//! be driven with logical on/off values.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Electrical level that means "active"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// High level activates the load
    #[default]
    ActiveHigh,
    /// Low level activates the load (typical for opto-isolated relay boards)
    ActiveLow,
}

impl Polarity {
    /// Electrical level for a logical activation
    pub fn level_for(self, active: bool) -> bool {
        match self {
            Polarity::ActiveHigh => active,
            Polarity::ActiveLow => !active,
        }
    }
}

/// Output pin addressed by logical activation instead of electrical level
pub struct PolarizedOutput<P: OutputPin> {
    pin: P,
    polarity: Polarity,
}

impl<P: OutputPin> PolarizedOutput<P> {
    /// Wrap a pin and immediately drive it inactive
    pub fn new(mut pin: P, polarity: Polarity) -> Self {
        pin.set_state(polarity.level_for(false));
        Self { pin, polarity }
    }

    /// Activate or deactivate the load
    pub fn set_active(&mut self, active: bool) {
        self.pin.set_state(self.polarity.level_for(active));
    }

    /// Check if the load is currently activated
    pub fn is_active(&self) -> bool {
        self.pin.is_set_high() == self.polarity.level_for(true)
    }

    /// Configured polarity
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePin {
        high: bool,
    }

    impl OutputPin for FakePin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_low_starts_released() {
        let out = PolarizedOutput::new(FakePin { high: false }, Polarity::ActiveLow);
        assert!(out.pin.is_set_high());
        assert!(!out.is_active());
    }

    #[test]
    fn test_active_low_inverts_level() {
        let mut out = PolarizedOutput::new(FakePin { high: false }, Polarity::ActiveLow);
        out.set_active(true);
        assert!(out.pin.is_set_low());
        assert!(out.is_active());

        out.set_active(false);
        assert!(out.pin.is_set_high());
    }

    #[test]
    fn test_active_high_follows_level() {
        let mut out = PolarizedOutput::new(FakePin { high: true }, Polarity::ActiveHigh);
        assert!(out.pin.is_set_low());

        out.set_active(true);
        assert!(out.pin.is_set_high());
        assert!(out.is_active());
    }
}
