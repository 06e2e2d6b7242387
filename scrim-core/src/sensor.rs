//! Potentiometer position
//!
//! The potentiometer is read fresh for every decoded signal. Its value both
//! selects learning mode and scales the lowering duration.

/// Number of counts spanning the potentiometer's travel
///
/// A 10-bit converter reports 0-1023; the duration math divides by the
/// full scale so the top of the travel lowers for just under the full time.
pub const POSITION_FULL_SCALE: u16 = 1024;

/// A single potentiometer sample in 10-bit counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotentiometerReading(u16);

impl PotentiometerReading {
    /// Create a reading, clamping to the full scale
    pub const fn new(counts: u16) -> Self {
        if counts > POSITION_FULL_SCALE {
            Self(POSITION_FULL_SCALE)
        } else {
            Self(counts)
        }
    }

    /// Raw counts
    pub const fn counts(self) -> u16 {
        self.0
    }

    /// Position as a fraction of full scale (0.0 ..= 1.0)
    pub fn fraction(self) -> f32 {
        self.0 as f32 / POSITION_FULL_SCALE as f32
    }

    /// Scale a duration by the potentiometer position
    pub fn scale_seconds(self, full_seconds: f32) -> f32 {
        full_seconds * self.fraction()
    }
}

impl From<u16> for PotentiometerReading {
    fn from(counts: u16) -> Self {
        Self::new(counts)
    }
}
