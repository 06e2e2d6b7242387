//! End-to-end controller scenarios
//!
//! Drives a `ScreenController` through the same sequence of main loop
//! iterations and clock ticks the firmware produces, with mocks that record
//! into shared state so it can be inspected while the controller owns them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use proptest::prelude::*;
use scrim_core::config::ControllerConfig;
use scrim_core::motion::{Action, IgnoreReason, MotionState, SignalOutcome};
use scrim_core::registry::{ButtonSignature, Role};
use scrim_core::sensor::PotentiometerReading;
use scrim_core::traits::{MotionOutputs, PowerControl, SignatureStore, StoreError, TickClock};
use scrim_core::ScreenController;

#[derive(Debug, Default)]
struct Bench {
    raise: bool,
    lower: bool,
    indicator: bool,
    clock_armed: bool,
    wake_armed: bool,
    halts: usize,
    both_lines_seen: bool,
}

type Shared = Rc<RefCell<Bench>>;

struct Outputs(Shared);

impl MotionOutputs for Outputs {
    fn set_raise_line(&mut self, active: bool) {
        let mut bench = self.0.borrow_mut();
        bench.raise = active;
        bench.both_lines_seen |= bench.raise && bench.lower;
    }

    fn set_lower_line(&mut self, active: bool) {
        let mut bench = self.0.borrow_mut();
        bench.lower = active;
        bench.both_lines_seen |= bench.raise && bench.lower;
    }

    fn set_indicator(&mut self, active: bool) {
        self.0.borrow_mut().indicator = active;
    }
}

struct Clock(Shared);

impl TickClock for Clock {
    fn arm(&mut self) {
        self.0.borrow_mut().clock_armed = true;
    }

    fn disarm(&mut self) {
        self.0.borrow_mut().clock_armed = false;
    }
}

struct Power(Shared);

impl PowerControl for Power {
    fn arm_wake_on_external_signal(&mut self) {
        self.0.borrow_mut().wake_armed = true;
    }

    fn enter_low_power_halt(&mut self) {
        self.0.borrow_mut().halts += 1;
    }
}

/// Non-volatile memory that survives controller restarts
#[derive(Clone, Default)]
struct Eeprom(Rc<RefCell<HashMap<Role, [u8; 5]>>>);

impl SignatureStore for Eeprom {
    fn read(&mut self, role: Role) -> Result<Option<ButtonSignature>, StoreError> {
        match self.0.borrow().get(&role) {
            Some(record) => ButtonSignature::decode_record(record)
                .map(Some)
                .map_err(|_| StoreError::Read),
            None => Ok(None),
        }
    }

    fn write(&mut self, role: Role, signature: &ButtonSignature) -> Result<(), StoreError> {
        let record = signature.encode_record().map_err(|_| StoreError::Write)?;
        self.0.borrow_mut().insert(role, record);
        Ok(())
    }
}

type Controller = ScreenController<Outputs, Eeprom, Clock, Power>;

const UP: ButtonSignature = ButtonSignature::new(2, 0x00FF, 0x46);
const DOWN: ButtonSignature = ButtonSignature::new(2, 0x00FF, 0x15);
const STRANGER: ButtonSignature = ButtonSignature::new(2, 0x00EF, 0x07);

struct Rig {
    bench: Shared,
    eeprom: Eeprom,
    controller: Controller,
}

impl Rig {
    fn boot(eeprom: Eeprom) -> Self {
        let bench = Shared::default();
        let mut controller = ScreenController::new(
            ControllerConfig::default(),
            Outputs(bench.clone()),
            eeprom.clone(),
            Clock(bench.clone()),
            Power(bench.clone()),
        );
        controller.load_buttons();
        Self {
            bench,
            eeprom,
            controller,
        }
    }

    fn learned() -> Self {
        let mut rig = Self::boot(Eeprom::default());
        rig.press(UP, 100);
        rig.press(DOWN, 0);
        rig
    }

    fn press(&mut self, signal: ButtonSignature, poti: u16) -> SignalOutcome {
        self.controller
            .poll(Some((signal, PotentiometerReading::new(poti))))
            .expect("signal produces an outcome")
            .expect("store accepts writes")
    }

    fn idle(&mut self) {
        assert_eq!(self.controller.poll(None), None);
    }

    /// Tick the clock while it is armed, at most `limit` times
    fn run_ticks(&mut self, limit: u32) -> Vec<Action> {
        let mut fired = Vec::new();
        for _ in 0..limit {
            if !self.bench.borrow().clock_armed {
                break;
            }
            fired.extend(self.controller.on_tick());
        }
        fired
    }

    fn restart(self) -> Self {
        Self::boot(self.eeprom)
    }

    fn lines(&self) -> (bool, bool) {
        let bench = self.bench.borrow();
        (bench.raise, bench.lower)
    }
}

#[test]
fn scenario_unknown_signal_with_unlearned_registry() {
    let mut rig = Rig::boot(Eeprom::default());

    let outcome = rig.press(STRANGER, 500);

    assert_eq!(outcome, SignalOutcome::Ignored(IgnoreReason::UnknownButton));
    assert_eq!(rig.lines(), (false, false));
    assert!(!rig.bench.borrow().indicator);
    assert_eq!(rig.controller.pending(), None);
}

#[test]
fn scenario_full_lowering_from_hidden() {
    let mut rig = Rig::learned();
    assert!(rig.controller.entirely_hidden());

    let outcome = rig.press(DOWN, 1024);

    assert_eq!(outcome, SignalOutcome::LowerStarted { full: true, ticks: 1426 });
    assert_eq!(rig.lines(), (false, true));
    assert!(!rig.controller.entirely_hidden());

    let fired = rig.run_ticks(5000);
    assert_eq!(fired, vec![Action::FinishLower]);
    assert_eq!(rig.lines(), (false, false));
    assert!(!rig.controller.entirely_hidden());
    assert_eq!(rig.controller.motion_state(), MotionState::Idle);
}

#[test]
fn scenario_abort_raise_with_lower() {
    let mut rig = Rig::learned();
    rig.press(UP, 600);
    // Leave 20 seconds of the raise
    for _ in 0..(1426 - 620) {
        assert_eq!(rig.controller.on_tick(), None);
    }
    assert_eq!(rig.controller.remaining_ticks(), Some(620));

    let outcome = rig.press(DOWN, 600);

    assert_eq!(outcome, SignalOutcome::Aborted(Action::FinishRaise));
    assert_eq!(rig.lines(), (false, false));
    assert_eq!(rig.controller.pending(), None);
    assert!(!rig.bench.borrow().clock_armed);
    assert!(!rig.controller.entirely_hidden());
}

#[test]
fn scenario_idle_sleep_and_wake() {
    let mut rig = Rig::learned();
    rig.idle();
    assert_eq!(rig.controller.pending(), Some(Action::EnterSleep));

    let fired = rig.run_ticks(100);

    assert_eq!(fired, vec![Action::EnterSleep]);
    let bench = rig.bench.borrow();
    assert!(!bench.indicator);
    assert!(bench.wake_armed);
    assert_eq!(bench.halts, 1);
    drop(bench);

    // Woken by the receiver; nothing is pending after wake
    rig.controller.wake();
    assert_eq!(rig.controller.pending(), None);
    assert_eq!(rig.controller.motion_state(), MotionState::Idle);
}

#[test]
fn idle_poll_after_halt_does_not_start_another_countdown() {
    let mut rig = Rig::learned();
    rig.idle();
    assert_eq!(rig.run_ticks(100), vec![Action::EnterSleep]);

    // The main loop may finish one idle iteration before it parks
    rig.idle();

    assert_eq!(rig.controller.pending(), None);
    assert!(!rig.bench.borrow().clock_armed);
    assert!(rig.run_ticks(200).is_empty());
    assert_eq!(rig.bench.borrow().halts, 1);

    rig.controller.wake();
    rig.idle();
    assert_eq!(rig.controller.pending(), Some(Action::EnterSleep));
    assert_eq!(rig.run_ticks(100), vec![Action::EnterSleep]);
    assert_eq!(rig.bench.borrow().halts, 2);
}

#[test]
fn scenario_sleep_waits_for_motion_to_finish() {
    let mut rig = Rig::learned();
    rig.press(UP, 600);
    for _ in 0..10 {
        rig.idle();
    }
    assert_eq!(rig.controller.pending(), Some(Action::FinishRaise));

    assert_eq!(rig.run_ticks(5000), vec![Action::FinishRaise]);
    assert!(rig.controller.entirely_hidden());

    rig.idle();
    assert_eq!(rig.run_ticks(100), vec![Action::EnterSleep]);
}

#[test]
fn scenario_signals_postpone_sleep() {
    let mut rig = Rig::learned();
    rig.idle();
    for _ in 0..5 {
        for _ in 0..50 {
            assert_eq!(rig.controller.on_tick(), None);
        }
        rig.press(STRANGER, 600);
    }
    assert_eq!(rig.bench.borrow().halts, 0);
    assert_eq!(rig.run_ticks(100), vec![Action::EnterSleep]);
}

#[test]
fn scenario_nudge_after_partial_lowering() {
    let mut rig = Rig::learned();
    rig.press(DOWN, 400);
    rig.run_ticks(5000);

    let outcome = rig.press(DOWN, 400);
    assert_eq!(outcome, SignalOutcome::LowerStarted { full: false, ticks: 16 });
    assert_eq!(rig.run_ticks(100), vec![Action::StepLowerSoon]);

    // Raise to recover a known position
    rig.press(UP, 400);
    rig.run_ticks(5000);
    assert!(rig.controller.entirely_hidden());
    assert!(matches!(
        rig.press(DOWN, 400),
        SignalOutcome::LowerStarted { full: true, .. }
    ));
}

#[test]
fn learned_buttons_survive_restart() {
    let mut rig = Rig::boot(Eeprom::default());
    assert_eq!(rig.press(UP, 150), SignalOutcome::Learned(Role::Raise));
    assert_eq!(rig.press(DOWN, 3), SignalOutcome::Learned(Role::Lower));

    let rig = rig.restart();

    assert!(rig.controller.registry().is_raise(&UP));
    assert!(rig.controller.registry().is_lower(&DOWN));
    assert!(!rig.controller.registry().is_raise(&DOWN));
}

#[test]
fn learning_does_not_interrupt_motion() {
    let mut rig = Rig::learned();
    rig.press(UP, 600);
    let before = rig.controller.remaining_ticks();

    assert_eq!(rig.press(STRANGER, 50), SignalOutcome::Learned(Role::Raise));

    assert_eq!(rig.controller.remaining_ticks(), before);
    assert_eq!(rig.lines(), (true, false));
}

#[derive(Debug, Clone)]
enum Event {
    Press(u8, u16),
    Idle,
    Ticks(u16),
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        (0u8..3, 0u16..=1024).prop_map(|(button, poti)| Event::Press(button, poti)),
        Just(Event::Idle),
        (1u16..1500).prop_map(Event::Ticks),
    ]
}

fn button(index: u8) -> ButtonSignature {
    match index {
        0 => UP,
        1 => DOWN,
        _ => STRANGER,
    }
}

proptest! {
    #[test]
    fn prop_at_most_one_motion(events in proptest::collection::vec(arb_event(), 1..60)) {
        let mut rig = Rig::learned();
        for event in events {
            match event {
                // Keep the learned buttons; learning is covered elsewhere
                Event::Press(index, poti) => {
                    rig.press(button(index), poti.max(200));
                }
                Event::Idle => rig.idle(),
                Event::Ticks(n) => {
                    for _ in 0..n {
                        rig.controller.on_tick();
                    }
                }
            }

            let (raise, lower) = rig.lines();
            prop_assert!(!(raise && lower));
            prop_assert_eq!(raise || lower, rig.controller.motion_state().is_moving());
            prop_assert_eq!(rig.bench.borrow().clock_armed, rig.controller.pending().is_some());
        }
        prop_assert!(!rig.bench.borrow().both_lines_seen);
    }

    #[test]
    fn prop_learning_never_moves(
        presses in proptest::collection::vec((0u8..3, 0u16..200), 1..30),
    ) {
        let mut rig = Rig::boot(Eeprom::default());
        for (index, poti) in presses {
            let outcome = rig.press(button(index), poti);
            prop_assert!(matches!(outcome, SignalOutcome::Learned(_)));
            prop_assert_eq!(rig.lines(), (false, false));
            prop_assert_eq!(rig.controller.pending(), None);
        }
    }
}
