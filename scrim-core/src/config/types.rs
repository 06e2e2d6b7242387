//! Controller configuration
//!
//! Timing and potentiometer thresholds for the motion controller.

use crate::sensor::POSITION_FULL_SCALE;

/// Reference tick rate of the hardware timer (ticks per second)
pub const DEFAULT_TICK_RATE_HZ: f32 = 31.0;

/// Time the screen needs to travel from fully lowered to fully hidden
pub const DEFAULT_FULL_TRAVEL_SECONDS: f32 = 46.0;

/// Length of the lowering nudge when the position is unknown
pub const DEFAULT_LOWER_STEP_SECONDS: f32 = 0.5;

/// Idle time before the controller goes to sleep
pub const DEFAULT_IDLE_TIMEOUT_SECONDS: f32 = 2.0;

/// Potentiometer readings below this value select learning mode
pub const DEFAULT_PROGRAMMING_THRESHOLD: u16 = 200;

/// Learning-mode readings below this value program the lower button
pub const DEFAULT_PROGRAMMING_LOWER_THRESHOLD: u16 = 10;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Tick rate must be positive and finite
    InvalidTickRate,
    /// A duration must be positive and finite
    InvalidDuration,
    /// Threshold outside the potentiometer range or lower threshold above
    /// the programming threshold
    InvalidThreshold,
}

/// Controller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Tick clock rate in ticks per second
    pub tick_rate_hz: f32,
    /// Full travel time in seconds; lowering from hidden scales this by the
    /// potentiometer position
    pub full_travel_seconds: f32,
    /// Lowering nudge in seconds when the position is unknown
    pub lower_step_seconds: f32,
    /// Seconds without a signal before sleeping
    pub idle_timeout_seconds: f32,
    /// Readings below this enter learning mode
    pub programming_threshold: u16,
    /// Learning-mode readings below this program the lower button
    pub programming_lower_threshold: u16,
    /// Assume the screen is hidden after power-up
    ///
    /// There is no limit switch, so the first lowering after boot relies on
    /// this assumption to scale its duration.
    pub assume_initially_hidden: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            full_travel_seconds: DEFAULT_FULL_TRAVEL_SECONDS,
            lower_step_seconds: DEFAULT_LOWER_STEP_SECONDS,
            idle_timeout_seconds: DEFAULT_IDLE_TIMEOUT_SECONDS,
            programming_threshold: DEFAULT_PROGRAMMING_THRESHOLD,
            programming_lower_threshold: DEFAULT_PROGRAMMING_LOWER_THRESHOLD,
            assume_initially_hidden: true,
        }
    }
}

impl ControllerConfig {
    /// Check the configuration for values the controller cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.tick_rate_hz) {
            return Err(ConfigError::InvalidTickRate);
        }

        for seconds in [
            self.full_travel_seconds,
            self.lower_step_seconds,
            self.idle_timeout_seconds,
        ] {
            if !is_positive(seconds) {
                return Err(ConfigError::InvalidDuration);
            }
        }

        if self.programming_threshold > POSITION_FULL_SCALE
            || self.programming_lower_threshold > self.programming_threshold
        {
            return Err(ConfigError::InvalidThreshold);
        }

        Ok(())
    }

    /// Tick period in microseconds, for timer setup
    pub fn tick_period_us(&self) -> u64 {
        libm::roundf(1_000_000.0 / self.tick_rate_hz) as u64
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
