//! Hardware configuration types
//!
//! Electrical details the firmware needs to drive the outputs. Pin numbers
//! are fixed per board; only polarity is configurable.

/// Output polarity configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputConfig {
    /// Relay inputs switch on a low level
    pub relays_active_low: bool,
    /// Indicator LED is wired to the supply and lights on a low level
    pub indicator_active_low: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        // Relay modules draw less current when held in active-low mode
        Self {
            relays_active_low: true,
            indicator_active_low: false,
        }
    }
}
