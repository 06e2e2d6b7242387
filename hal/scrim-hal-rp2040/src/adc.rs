//! Potentiometer sampling
//!
//! RP2040 has a single 12-bit ADC. The controller works in 10-bit counts
//! (0-1023), so readings are shifted down by two bits.
//!
//! The read is asynchronous: while the conversion runs the executor has
//! nothing to do and the core idles until the ADC FIFO interrupt fires.

use embassy_rp::adc::{Adc, Async, Channel, Error};

/// Resolution of the RP2040 ADC in bits
pub const ADC_BITS: u8 = 12;

/// Resolution the controller expects in bits
pub const POSITION_BITS: u8 = 10;

/// Potentiometer on one ADC channel
pub struct Potentiometer<'d> {
    adc: Adc<'d, Async>,
    channel: Channel<'d>,
}

impl<'d> Potentiometer<'d> {
    /// Create from an initialized ADC and the wiper channel
    pub fn new(adc: Adc<'d, Async>, channel: Channel<'d>) -> Self {
        Self { adc, channel }
    }

    /// Read the wiper position in 10-bit counts
    pub async fn read_counts(&mut self) -> Result<u16, Error> {
        let raw = self.adc.read(&mut self.channel).await?;
        Ok(scale_to_position(raw))
    }
}

/// Convert a raw 12-bit sample to 10-bit position counts
pub const fn scale_to_position(raw: u16) -> u16 {
    (raw & 0x0FFF) >> (ADC_BITS - POSITION_BITS)
}
