//! Output line traits

/// The two motor relays and the activity indicator
///
/// Values are logical activations. Whether a relay switches on a high or a
/// low level is the implementation's concern.
///
/// The raise and lower lines must never both be active; the controller
/// only ever activates one of them at a time.
pub trait MotionOutputs {
    /// Drive the relay that raises (hides) the screen
    fn set_raise_line(&mut self, active: bool);

    /// Drive the relay that lowers the screen
    fn set_lower_line(&mut self, active: bool);

    /// Drive the activity indicator
    fn set_indicator(&mut self, active: bool);

    /// Release both motor relays
    fn release_motor(&mut self) {
        self.set_raise_line(false);
        self.set_lower_line(false);
    }
}
