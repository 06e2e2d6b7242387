//! Screen controller
//!
//! Owns every piece of controller state and is the single entry point for
//! the three event sources:
//!
//! - [`poll`](ScreenController::poll) once per main loop iteration, with a
//!   decoded signal and a fresh potentiometer reading if one arrived
//! - [`on_tick`](ScreenController::on_tick) for every tick clock period
//! - [`load_buttons`](ScreenController::load_buttons) once at startup
//! - [`wake`](ScreenController::wake) when the wake trigger ends a sleep
//!
//! The firmware keeps this value behind one critical-section mutex, so
//! none of these ever interleave.

use crate::config::ControllerConfig;
use crate::motion::{Action, MotionController, MotionMemory, MotionState, SignalOutcome};
use crate::power::PowerManager;
use crate::registry::{ButtonRegistry, ButtonSignature, LoadReport};
use crate::scheduler::DeferredScheduler;
use crate::sensor::PotentiometerReading;
use crate::traits::{MotionOutputs, PowerControl, SignatureStore, StoreError, TickClock};

/// Controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// Persisting a learned button failed
    Store(StoreError),
}

impl From<StoreError> for ControllerError {
    fn from(e: StoreError) -> Self {
        ControllerError::Store(e)
    }
}

/// Complete controller state
pub struct ScreenController<O, S, C, P>
where
    O: MotionOutputs,
    S: SignatureStore,
    C: TickClock,
    P: PowerControl,
{
    config: ControllerConfig,
    outputs: O,
    registry: ButtonRegistry<S>,
    scheduler: DeferredScheduler<Action, C>,
    motion: MotionController,
    power_manager: PowerManager,
    power: P,
}

impl<O, S, C, P> ScreenController<O, S, C, P>
where
    O: MotionOutputs,
    S: SignatureStore,
    C: TickClock,
    P: PowerControl,
{
    /// Create a controller in the idle state
    ///
    /// Both relays and the indicator are switched off first thing.
    pub fn new(config: ControllerConfig, mut outputs: O, store: S, clock: C, power: P) -> Self {
        outputs.release_motor();
        outputs.set_indicator(false);

        Self {
            outputs,
            registry: ButtonRegistry::new(store),
            scheduler: DeferredScheduler::new(clock, config.tick_rate_hz),
            motion: MotionController::new(&config),
            power_manager: PowerManager::new(&config),
            power,
            config,
        }
    }

    /// Load the learned buttons from the store
    pub fn load_buttons(&mut self) -> LoadReport {
        self.registry.load()
    }

    /// Handle a decoded signal
    pub fn on_signal(
        &mut self,
        signal: ButtonSignature,
        poti: PotentiometerReading,
    ) -> Result<SignalOutcome, ControllerError> {
        let outcome = self.motion.on_signal(
            signal,
            poti,
            &mut self.registry,
            &mut self.scheduler,
            &mut self.outputs,
        )?;
        Ok(outcome)
    }

    /// Main loop iteration without a signal
    pub fn on_idle(&mut self) {
        if let Some(action) = self.power_manager.on_idle_tick(&mut self.scheduler) {
            self.run_action(action);
        }
    }

    /// One main loop iteration
    ///
    /// With a signal, handles it and restarts a running sleep countdown.
    /// A signal also counts as waking up. Without one, starts the sleep
    /// countdown if the controller is idle and awake. Returns the outcome
    /// of a handled signal.
    pub fn poll(
        &mut self,
        input: Option<(ButtonSignature, PotentiometerReading)>,
    ) -> Option<Result<SignalOutcome, ControllerError>> {
        match input {
            Some((signal, poti)) => {
                self.power_manager.wake();
                let result = self.on_signal(signal, poti);
                self.power_manager.on_signal_received(&mut self.scheduler);
                Some(result)
            }
            None => {
                self.on_idle();
                None
            }
        }
    }

    /// Handle one tick clock period
    ///
    /// Returns the action that ran, if any.
    pub fn on_tick(&mut self) -> Option<Action> {
        let action = self.scheduler.tick()?;
        self.run_action(action);
        Some(action)
    }

    /// Run an action body right away
    pub fn run_action(&mut self, action: Action) {
        if !self.motion.run_action(action, &mut self.outputs) {
            self.power_manager.enter_sleep(&mut self.outputs, &mut self.power);
        }
    }

    /// Leave sleep after the wake trigger fired
    ///
    /// Nothing is pending afterwards; the next idle iteration starts a
    /// fresh sleep countdown.
    pub fn wake(&mut self) {
        self.power_manager.wake();
    }

    /// Check if the controller is asleep
    pub fn is_sleeping(&self) -> bool {
        self.power_manager.is_sleeping()
    }

    /// Current motion state
    pub fn motion_state(&self) -> MotionState {
        MotionState::from_pending(self.scheduler.pending())
    }

    /// Position memory
    pub fn memory(&self) -> MotionMemory {
        self.motion.memory()
    }

    /// Check if the screen is believed to be fully hidden
    pub fn entirely_hidden(&self) -> bool {
        self.motion.memory().entirely_hidden()
    }

    /// Currently pending action
    pub fn pending(&self) -> Option<Action> {
        self.scheduler.pending()
    }

    /// Ticks left until the pending action runs
    pub fn remaining_ticks(&self) -> Option<u32> {
        self.scheduler.remaining_ticks()
    }

    /// Check if the tick clock should be running
    pub fn is_clock_armed(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// Active configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Output lines
    pub fn outputs(&self) -> &O {
        &self.outputs
    }

    /// Button registry
    pub fn registry(&self) -> &ButtonRegistry<S> {
        &self.registry
    }

    /// Power control
    pub fn power(&self) -> &P {
        &self.power
    }

    /// Mutable power control
    pub fn power_mut(&mut self) -> &mut P {
        &mut self.power
    }

    /// Number of times the controller went to sleep
    pub fn sleep_count(&self) -> u32 {
        self.power_manager.sleep_count()
    }
}
