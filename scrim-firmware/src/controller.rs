//! Shared controller state and its hardware adapters
//!
//! The controller lives in a single static behind a critical-section
//! mutex. Both the tick task and the controller task lock it for one
//! synchronous call at a time, so every event is handled atomically.

use core::cell::RefCell;

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use scrim_core::registry::{ButtonSignature, Role};
use scrim_core::traits::{MotionOutputs, PowerControl, SignatureStore, StoreError, TickClock};
use scrim_core::ScreenController;
use scrim_hal_rp2040::gpio::LogicalOutput;

use crate::channels::{PERSIST_CHANNEL, SLEEP_REQUEST, TICK_ARMED, WAKE, WAKE_LATCH};

/// Controller type used by the firmware
pub type Controller =
    ScreenController<RelayOutputs, FlashSignatureStore, SignalTickClock, SleepControl>;

/// The one controller instance
static CONTROLLER: Mutex<CriticalSectionRawMutex, RefCell<Option<Controller>>> =
    Mutex::new(RefCell::new(None));

/// Install the controller
pub fn install(controller: Controller) {
    CONTROLLER.lock(|cell| cell.replace(Some(controller)));
}

/// Run `f` on the controller inside a critical section
///
/// Returns `None` before [`install`] has been called.
pub fn with_controller<R>(f: impl FnOnce(&mut Controller) -> R) -> Option<R> {
    CONTROLLER.lock(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Relay and indicator outputs
pub struct RelayOutputs {
    raise: LogicalOutput<'static>,
    lower: LogicalOutput<'static>,
    indicator: LogicalOutput<'static>,
}

impl RelayOutputs {
    pub fn new(
        raise: LogicalOutput<'static>,
        lower: LogicalOutput<'static>,
        indicator: LogicalOutput<'static>,
    ) -> Self {
        Self {
            raise,
            lower,
            indicator,
        }
    }
}

impl MotionOutputs for RelayOutputs {
    fn set_raise_line(&mut self, active: bool) {
        if active && self.lower.is_active() {
            // Never drive the motor both ways
            warn!("Raise requested while lowering; releasing lower relay first");
            self.lower.set_active(false);
        }
        self.raise.set_active(active);
    }

    fn set_lower_line(&mut self, active: bool) {
        if active && self.raise.is_active() {
            warn!("Lower requested while raising; releasing raise relay first");
            self.raise.set_active(false);
        }
        self.lower.set_active(active);
    }

    fn set_indicator(&mut self, active: bool) {
        self.indicator.set_active(active);
    }
}

/// Signature store backed by a boot-time snapshot and the flash task
///
/// Flash access is async and cannot happen inside the critical section.
/// Reads are served from what was loaded at boot; writes update the
/// snapshot and are queued for the persist task.
pub struct FlashSignatureStore {
    snapshot: [Result<Option<ButtonSignature>, StoreError>; 2],
}

impl FlashSignatureStore {
    pub fn new(snapshot: [Result<Option<ButtonSignature>, StoreError>; 2]) -> Self {
        Self { snapshot }
    }
}

impl SignatureStore for FlashSignatureStore {
    fn read(&mut self, role: Role) -> Result<Option<ButtonSignature>, StoreError> {
        self.snapshot[role.index()]
    }

    fn write(&mut self, role: Role, signature: &ButtonSignature) -> Result<(), StoreError> {
        self.snapshot[role.index()] = Ok(Some(*signature));
        PERSIST_CHANNEL
            .try_send((role, *signature))
            .map_err(|_| StoreError::Busy)
    }
}

/// Tick clock driven by the tick task
pub struct SignalTickClock;

impl TickClock for SignalTickClock {
    fn arm(&mut self) {
        TICK_ARMED.signal(true);
    }

    fn disarm(&mut self) {
        TICK_ARMED.signal(false);
    }
}

/// Sleep and wake control
///
/// The halt itself happens in the controller task once it has left the
/// critical section: it parks until the IR task reports activity, and with
/// every task waiting the executor keeps the core in WFE.
pub struct SleepControl;

impl PowerControl for SleepControl {
    fn arm_wake_on_external_signal(&mut self) {
        WAKE.reset();
        WAKE_LATCH.arm();
    }

    fn enter_low_power_halt(&mut self) {
        SLEEP_REQUEST.signal(());
    }
}
