//! Tick clock trait

/// Periodic tick source driving the deferred action scheduler
///
/// While armed, the implementation must call the scheduler's tick handler
/// once per period. Arming an already armed clock restarts the period.
pub trait TickClock {
    /// Start delivering ticks
    fn arm(&mut self);

    /// Stop delivering ticks
    fn disarm(&mut self);
}
