//! Motion controller
//!
//! Turns one decoded remote signal plus a fresh potentiometer reading into
//! a relay change and a deferred action:
//!
//! | Pending action            | Raise button   | Lower button        |
//! |---------------------------|----------------|---------------------|
//! | `FinishLower` / `StepLowerSoon` | abort    | ignore / new step   |
//! | `FinishRaise`             | ignore         | abort               |
//! | nothing / `EnterSleep`    | start raise    | start lowering      |
//!
//! A lowering from the hidden position runs for a share of the full travel
//! time set by the potentiometer. From any other position the true
//! position is unknown, so lowering only nudges the screen a little.
//!
//! Readings below the programming threshold bypass all of this and store
//! the signal as a learned button instead.

use super::action::Action;
use super::state::MotionMemory;
use crate::config::ControllerConfig;
use crate::registry::{ButtonRegistry, ButtonSignature, Role};
use crate::scheduler::DeferredScheduler;
use crate::sensor::PotentiometerReading;
use crate::traits::{MotionOutputs, SignatureStore, StoreError, TickClock};

/// Why a signal caused no change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IgnoreReason {
    /// Raise pressed while already raising
    AlreadyRaising,
    /// Lower pressed while already lowering
    AlreadyLowering,
    /// Signal matches neither learned button
    UnknownButton,
}

/// What the controller did with a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalOutcome {
    /// Stored as the button for a role
    Learned(Role),
    /// Raise relay switched on for the full travel time
    RaiseStarted {
        /// Ticks until the relay is released
        ticks: u32,
    },
    /// Lower relay switched on
    LowerStarted {
        /// True for a potentiometer-scaled lowering from hidden, false for
        /// a short nudge
        full: bool,
        /// Ticks until the relay is released
        ticks: u32,
    },
    /// The motion ending with this action was stopped
    Aborted(Action),
    /// Nothing changed
    Ignored(IgnoreReason),
}

/// Motion decision logic and position memory
#[derive(Debug, Clone)]
pub struct MotionController {
    memory: MotionMemory,
    full_travel_seconds: f32,
    lower_step_seconds: f32,
    programming_threshold: u16,
    programming_lower_threshold: u16,
}

impl MotionController {
    /// Create from configuration
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            memory: MotionMemory::new(config.assume_initially_hidden),
            full_travel_seconds: config.full_travel_seconds,
            lower_step_seconds: config.lower_step_seconds,
            programming_threshold: config.programming_threshold,
            programming_lower_threshold: config.programming_lower_threshold,
        }
    }

    /// Current position memory
    pub fn memory(&self) -> MotionMemory {
        self.memory
    }

    /// Check if a reading selects learning mode
    pub fn is_learning(&self, poti: PotentiometerReading) -> bool {
        poti.counts() < self.programming_threshold
    }

    /// Handle a decoded signal
    ///
    /// A failed write while learning is returned as an error; the button is
    /// learned in memory regardless.
    pub fn on_signal<S, C, O>(
        &mut self,
        signal: ButtonSignature,
        poti: PotentiometerReading,
        registry: &mut ButtonRegistry<S>,
        scheduler: &mut DeferredScheduler<Action, C>,
        outputs: &mut O,
    ) -> Result<SignalOutcome, StoreError>
    where
        S: SignatureStore,
        C: TickClock,
        O: MotionOutputs,
    {
        if self.is_learning(poti) {
            outputs.set_indicator(true);
            let role = if poti.counts() < self.programming_lower_threshold {
                Role::Lower
            } else {
                Role::Raise
            };
            registry.learn(role, signal)?;
            return Ok(SignalOutcome::Learned(role));
        }

        // Raise is checked first, so a button learned for both roles raises
        if registry.is_raise(&signal) {
            return Ok(self.on_raise(scheduler, outputs));
        }

        if registry.is_lower(&signal) {
            return Ok(self.on_lower(poti, scheduler, outputs));
        }

        Ok(SignalOutcome::Ignored(IgnoreReason::UnknownButton))
    }

    fn on_raise<C, O>(
        &mut self,
        scheduler: &mut DeferredScheduler<Action, C>,
        outputs: &mut O,
    ) -> SignalOutcome
    where
        C: TickClock,
        O: MotionOutputs,
    {
        match scheduler.pending() {
            Some(action) if action.is_lowering() => {
                self.abort(scheduler, outputs);
                SignalOutcome::Aborted(action)
            }
            Some(Action::FinishRaise) => SignalOutcome::Ignored(IgnoreReason::AlreadyRaising),
            _ => {
                self.memory.motion_started();
                outputs.set_indicator(true);
                outputs.set_raise_line(true);
                let ticks = self.start(
                    scheduler,
                    outputs,
                    self.full_travel_seconds,
                    Action::FinishRaise,
                );
                SignalOutcome::RaiseStarted { ticks }
            }
        }
    }

    fn on_lower<C, O>(
        &mut self,
        poti: PotentiometerReading,
        scheduler: &mut DeferredScheduler<Action, C>,
        outputs: &mut O,
    ) -> SignalOutcome
    where
        C: TickClock,
        O: MotionOutputs,
    {
        match scheduler.pending() {
            Some(Action::FinishRaise) => {
                self.abort(scheduler, outputs);
                SignalOutcome::Aborted(Action::FinishRaise)
            }
            Some(Action::FinishLower) => SignalOutcome::Ignored(IgnoreReason::AlreadyLowering),
            _ => {
                outputs.set_indicator(true);
                outputs.set_lower_line(true);

                if self.memory.entirely_hidden() {
                    let seconds = poti.scale_seconds(self.full_travel_seconds);
                    self.memory.motion_started();
                    let ticks = self.start(scheduler, outputs, seconds, Action::FinishLower);
                    SignalOutcome::LowerStarted { full: true, ticks }
                } else {
                    let ticks = self.start(
                        scheduler,
                        outputs,
                        self.lower_step_seconds,
                        Action::StepLowerSoon,
                    );
                    SignalOutcome::LowerStarted { full: false, ticks }
                }
            }
        }
    }

    /// Schedule the end of a motion that was just switched on
    fn start<C, O>(
        &mut self,
        scheduler: &mut DeferredScheduler<Action, C>,
        outputs: &mut O,
        seconds: f32,
        finish: Action,
    ) -> u32
    where
        C: TickClock,
        O: MotionOutputs,
    {
        let ticks = scheduler.ticks_for(seconds);
        // A zero-length motion ends right here
        if let Some(action) = scheduler.schedule(seconds, finish) {
            self.run_action(action, outputs);
        }
        ticks
    }

    fn abort<C, O>(&mut self, scheduler: &mut DeferredScheduler<Action, C>, outputs: &mut O)
    where
        C: TickClock,
        O: MotionOutputs,
    {
        if let Some(action) = scheduler.schedule(0.0, Action::StopBoth) {
            self.run_action(action, outputs);
        }
    }

    /// Run the body of a motion action
    ///
    /// Returns false for actions that are not motion related
    /// ([`Action::EnterSleep`]); those belong to the power manager.
    pub fn run_action<O: MotionOutputs>(&mut self, action: Action, outputs: &mut O) -> bool {
        match action {
            Action::FinishRaise => {
                self.memory.raise_completed();
                Self::stop(outputs);
            }
            Action::StopBoth | Action::StepLowerSoon | Action::FinishLower => Self::stop(outputs),
            Action::EnterSleep => return false,
        }
        true
    }

    fn stop<O: MotionOutputs>(outputs: &mut O) {
        outputs.release_motor();
        outputs.set_indicator(false);
    }
}
