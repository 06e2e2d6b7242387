//! Deferred actions
//!
//! The closed set of things the scheduler can run. The pending action is
//! compared by value to decide between aborting and ignoring a press.

/// Action run by the scheduler when its countdown expires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Release both relays right away (abort path)
    StopBoth,
    /// End of a full raise; the screen is now hidden
    FinishRaise,
    /// End of a short lowering nudge
    StepLowerSoon,
    /// End of a lowering scaled by the potentiometer
    FinishLower,
    /// Idle timeout expired
    EnterSleep,
}

impl Action {
    /// Check if this action ends a lowering motion
    pub fn is_lowering(self) -> bool {
        matches!(self, Action::FinishLower | Action::StepLowerSoon)
    }

    /// Check if this action ends any motion
    pub fn is_motion(self) -> bool {
        matches!(
            self,
            Action::FinishRaise | Action::FinishLower | Action::StepLowerSoon
        )
    }
}
