//! Single-slot deferred action scheduler
//!
//! At most one action is pending at any time. Scheduling replaces whatever
//! was pending; callers decide between replacing and
//! [`rebase_if_pending`](DeferredScheduler::rebase_if_pending).
//!
//! The scheduler never runs action bodies itself. [`tick`](DeferredScheduler::tick)
//! and [`schedule`](DeferredScheduler::schedule) hand the action back to
//! the caller after the pending slot has been cleared, so an action body
//! that schedules again always starts from an empty slot.
//!
//! Durations are converted with `round(seconds * tick_rate)`. A positive
//! duration always waits at least one tick. Zero, negative and NaN
//! durations all take the immediate path.

use crate::traits::TickClock;

/// Action waiting for its tick count to run out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingAction<A> {
    /// Action to run
    pub action: A,
    /// Ticks left; always at least 1 while pending
    pub remaining_ticks: u32,
}

/// Tick-driven scheduler for one deferred action
pub struct DeferredScheduler<A: Copy + Eq, C: TickClock> {
    clock: C,
    tick_rate_hz: f32,
    pending: Option<PendingAction<A>>,
    armed: bool,
}

impl<A: Copy + Eq, C: TickClock> DeferredScheduler<A, C> {
    /// Create an idle scheduler
    pub fn new(clock: C, tick_rate_hz: f32) -> Self {
        Self {
            clock,
            tick_rate_hz,
            pending: None,
            armed: false,
        }
    }

    /// Convert seconds to ticks
    ///
    /// Returns 0 only for durations that take the immediate path.
    pub fn ticks_for(&self, seconds: f32) -> u32 {
        // Also catches NaN
        if !(seconds > 0.0) {
            return 0;
        }
        (libm::roundf(seconds * self.tick_rate_hz) as u32).max(1)
    }

    /// Run `action` after `seconds`
    ///
    /// Replaces any pending action and (re)arms the clock. With a zero
    /// duration the pending action is cancelled instead, the clock is
    /// disarmed, and `action` is returned for the caller to run right away.
    #[must_use = "an immediate action must be run by the caller"]
    pub fn schedule(&mut self, seconds: f32, action: A) -> Option<A> {
        let ticks = self.ticks_for(seconds);
        if ticks == 0 {
            self.cancel();
            return Some(action);
        }

        self.pending = Some(PendingAction {
            action,
            remaining_ticks: ticks,
        });
        self.clock.arm();
        self.armed = true;
        None
    }

    /// Restart the countdown of `action` if it is the pending action
    ///
    /// Returns true if the countdown was restarted. Any other pending
    /// action is left untouched.
    pub fn rebase_if_pending(&mut self, seconds: f32, action: A) -> bool {
        let ticks = self.ticks_for(seconds).max(1);
        match self.pending.as_mut() {
            Some(pending) if pending.action == action => {
                pending.remaining_ticks = ticks;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending action without running it
    pub fn cancel(&mut self) {
        self.clock.disarm();
        self.armed = false;
        self.pending = None;
    }

    /// Handle one clock tick
    ///
    /// Returns the action that became due. The slot is already empty and
    /// the clock disarmed when it is returned.
    pub fn tick(&mut self) -> Option<A> {
        if let Some(pending) = self.pending.as_mut() {
            pending.remaining_ticks = pending.remaining_ticks.saturating_sub(1);
            if pending.remaining_ticks > 0 {
                return None;
            }
        }

        let fired = self.pending.take().map(|p| p.action);
        if fired.is_some() {
            self.cancel();
        }
        fired
    }

    /// Currently pending action
    pub fn pending(&self) -> Option<A> {
        self.pending.map(|p| p.action)
    }

    /// Check if `action` is the pending action
    pub fn is_pending(&self, action: A) -> bool {
        self.pending() == Some(action)
    }

    /// Ticks left until the pending action runs
    pub fn remaining_ticks(&self) -> Option<u32> {
        self.pending.map(|p| p.remaining_ticks)
    }

    /// Check if the tick clock is armed
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Configured tick rate
    pub fn tick_rate_hz(&self) -> f32 {
        self.tick_rate_hz
    }

    /// Access the tick clock
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
