//! Idle-to-sleep manager
//!
//! The sleep countdown shares the scheduler's single slot with the motion
//! actions. It is only started while nothing else is pending, so a running
//! motion is never cut short by sleep, and a motion started during the
//! countdown simply replaces it.

use crate::config::ControllerConfig;
use crate::motion::Action;
use crate::scheduler::DeferredScheduler;
use crate::traits::{MotionOutputs, PowerControl, TickClock};

/// Schedules sleep after inactivity and carries out the sleep action
#[derive(Debug, Clone, Copy)]
pub struct PowerManager {
    idle_timeout_seconds: f32,
    sleeps: u32,
    sleeping: bool,
}

impl PowerManager {
    /// Create from configuration
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            idle_timeout_seconds: config.idle_timeout_seconds,
            sleeps: 0,
            sleeping: false,
        }
    }

    /// Main loop iteration without a signal
    ///
    /// Starts the sleep countdown if nothing is pending and the controller
    /// is awake. Returns an action the caller must run right away, which
    /// only happens for a zero timeout.
    #[must_use = "an immediate action must be run by the caller"]
    pub fn on_idle_tick<C: TickClock>(
        &self,
        scheduler: &mut DeferredScheduler<Action, C>,
    ) -> Option<Action> {
        if self.sleeping || scheduler.pending().is_some() {
            return None;
        }
        scheduler.schedule(self.idle_timeout_seconds, Action::EnterSleep)
    }

    /// A signal was received; restart a running sleep countdown
    pub fn on_signal_received<C: TickClock>(
        &self,
        scheduler: &mut DeferredScheduler<Action, C>,
    ) -> bool {
        scheduler.rebase_if_pending(self.idle_timeout_seconds, Action::EnterSleep)
    }

    /// Body of [`Action::EnterSleep`]
    ///
    /// Stays asleep until [`wake`](Self::wake), so idle iterations that
    /// race the halt do not start another countdown.
    pub fn enter_sleep<O, P>(&mut self, outputs: &mut O, power: &mut P)
    where
        O: MotionOutputs,
        P: PowerControl,
    {
        outputs.set_indicator(false);
        power.arm_wake_on_external_signal();
        self.sleeps = self.sleeps.wrapping_add(1);
        self.sleeping = true;
        power.enter_low_power_halt();
    }

    /// The wake trigger fired
    pub fn wake(&mut self) {
        self.sleeping = false;
    }

    /// Check if the controller is halted waiting for a wake trigger
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Number of times the controller went to sleep
    pub fn sleep_count(&self) -> u32 {
        self.sleeps
    }

    /// Configured idle timeout
    pub fn idle_timeout_seconds(&self) -> f32 {
        self.idle_timeout_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullClock;

    impl TickClock for NullClock {
        fn arm(&mut self) {}
        fn disarm(&mut self) {}
    }

    #[derive(Default)]
    struct Indicator(bool);

    impl MotionOutputs for Indicator {
        fn set_raise_line(&mut self, _active: bool) {}
        fn set_lower_line(&mut self, _active: bool) {}
        fn set_indicator(&mut self, active: bool) {
            self.0 = active;
        }
    }

    #[derive(Default)]
    struct Power {
        calls: [Option<&'static str>; 2],
    }

    impl PowerControl for Power {
        fn arm_wake_on_external_signal(&mut self) {
            self.calls[0] = Some("arm");
        }

        fn enter_low_power_halt(&mut self) {
            // The wake trigger must be armed before halting
            assert_eq!(self.calls[0], Some("arm"));
            self.calls[1] = Some("halt");
        }
    }

    fn setup() -> (PowerManager, DeferredScheduler<Action, NullClock>) {
        let config = ControllerConfig::default();
        (
            PowerManager::new(&config),
            DeferredScheduler::new(NullClock, config.tick_rate_hz),
        )
    }

    #[test]
    fn test_idle_schedules_sleep() {
        let (power, mut scheduler) = setup();
        assert_eq!(power.on_idle_tick(&mut scheduler), None);
        assert_eq!(scheduler.pending(), Some(Action::EnterSleep));
        assert_eq!(scheduler.remaining_ticks(), Some(62));
    }

    #[test]
    fn test_idle_keeps_running_countdown() {
        let (power, mut scheduler) = setup();
        let _ = power.on_idle_tick(&mut scheduler);
        scheduler.tick();
        let _ = power.on_idle_tick(&mut scheduler);
        assert_eq!(scheduler.remaining_ticks(), Some(61));
    }

    #[test]
    fn test_idle_never_replaces_motion() {
        let (power, mut scheduler) = setup();
        let _ = scheduler.schedule(46.0, Action::FinishRaise);
        let _ = power.on_idle_tick(&mut scheduler);
        assert_eq!(scheduler.pending(), Some(Action::FinishRaise));
    }

    #[test]
    fn test_signal_restarts_countdown() {
        let (power, mut scheduler) = setup();
        let _ = power.on_idle_tick(&mut scheduler);
        for _ in 0..50 {
            scheduler.tick();
        }
        assert!(power.on_signal_received(&mut scheduler));
        assert_eq!(scheduler.remaining_ticks(), Some(62));
    }

    #[test]
    fn test_signal_leaves_motion_alone() {
        let (power, mut scheduler) = setup();
        let _ = scheduler.schedule(0.5, Action::StepLowerSoon);
        assert!(!power.on_signal_received(&mut scheduler));
        assert_eq!(scheduler.remaining_ticks(), Some(16));
    }

    #[test]
    fn test_zero_timeout_sleeps_immediately() {
        let config = ControllerConfig {
            idle_timeout_seconds: 0.0,
            ..ControllerConfig::default()
        };
        let power = PowerManager::new(&config);
        let mut scheduler = DeferredScheduler::new(NullClock, config.tick_rate_hz);
        assert_eq!(power.on_idle_tick(&mut scheduler), Some(Action::EnterSleep));
        assert_eq!(scheduler.pending(), None);
    }

    #[test]
    fn test_enter_sleep_sequence() {
        let (mut power, _) = setup();
        let mut indicator = Indicator(true);
        let mut control = Power::default();

        power.enter_sleep(&mut indicator, &mut control);

        assert!(!indicator.0);
        assert_eq!(control.calls, [Some("arm"), Some("halt")]);
        assert_eq!(power.sleep_count(), 1);
        assert!(power.is_sleeping());
    }

    #[test]
    fn test_no_countdown_while_asleep() {
        let (mut power, mut scheduler) = setup();
        power.enter_sleep(&mut Indicator(true), &mut Power::default());

        assert_eq!(power.on_idle_tick(&mut scheduler), None);
        assert_eq!(scheduler.pending(), None);

        power.wake();
        assert!(!power.is_sleeping());
        assert_eq!(power.on_idle_tick(&mut scheduler), None);
        assert_eq!(scheduler.pending(), Some(Action::EnterSleep));
    }

    #[test]
    fn test_zero_timeout_sleeps_once() {
        let config = ControllerConfig {
            idle_timeout_seconds: 0.0,
            ..ControllerConfig::default()
        };
        let mut power = PowerManager::new(&config);
        let mut scheduler = DeferredScheduler::new(NullClock, config.tick_rate_hz);
        assert_eq!(power.on_idle_tick(&mut scheduler), Some(Action::EnterSleep));
        power.enter_sleep(&mut Indicator(false), &mut Power::default());

        assert_eq!(power.on_idle_tick(&mut scheduler), None);
        assert_eq!(power.sleep_count(), 1);
    }
}
