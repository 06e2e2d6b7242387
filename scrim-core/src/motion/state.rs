//! Motion state
//!
//! The screen has no position sensor. What the controller knows is the
//! pending action plus a single belief flag about the last full raise.

use super::action::Action;

/// Position memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionMemory {
    entirely_hidden: bool,
}

impl MotionMemory {
    /// Create with the assumed power-up position
    pub const fn new(assume_hidden: bool) -> Self {
        Self {
            entirely_hidden: assume_hidden,
        }
    }

    /// Check if the screen is believed to be fully hidden
    pub fn entirely_hidden(&self) -> bool {
        self.entirely_hidden
    }

    /// A motion started; the position is no longer known
    pub fn motion_started(&mut self) {
        self.entirely_hidden = false;
    }

    /// A full raise completed
    pub fn raise_completed(&mut self) {
        self.entirely_hidden = true;
    }
}

/// Derived controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// No motion; nothing or only the idle timeout pending
    Idle,
    /// Raise relay on until the full travel time expires
    Raising,
    /// Lower relay on for the potentiometer-scaled time
    LoweringFull,
    /// Lower relay on for a short nudge
    LoweringStep,
}

impl MotionState {
    /// Derive the state from the pending action
    pub fn from_pending(pending: Option<Action>) -> Self {
        match pending {
            Some(Action::FinishRaise) => MotionState::Raising,
            Some(Action::FinishLower) => MotionState::LoweringFull,
            Some(Action::StepLowerSoon) => MotionState::LoweringStep,
            Some(Action::StopBoth) | Some(Action::EnterSleep) | None => MotionState::Idle,
        }
    }

    /// Check if a relay is running
    pub fn is_moving(&self) -> bool {
        !matches!(self, MotionState::Idle)
    }
}
