//! Power state trait

/// Low-power halt and wake-up control
pub trait PowerControl {
    /// Arm a one-shot wake trigger on activity of the IR receiver line
    ///
    /// The trigger must disable itself once it fires; it is armed again on
    /// the next sleep.
    fn arm_wake_on_external_signal(&mut self);

    /// Halt in the lowest power mode until the wake trigger fires
    ///
    /// This is called from tick context. Implementations that cannot halt
    /// there must record the request and halt as soon as the caller returns.
    fn enter_low_power_halt(&mut self);
}
