//! Inter-task communication channels
//!
//! Defines the static channels and signals used between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use scrim_core::power::WakeLatch;
use scrim_core::registry::{ButtonSignature, Role};

/// Channel capacity for decoded remote signals
const SIGNAL_CHANNEL_SIZE: usize = 4;

/// Channel capacity for pending flash writes
const PERSIST_CHANNEL_SIZE: usize = 2;

/// Decoded remote signals from the IR receiver
pub static SIGNAL_CHANNEL: Channel<
    CriticalSectionRawMutex,
    ButtonSignature,
    SIGNAL_CHANNEL_SIZE,
> = Channel::new();

/// Learned buttons waiting to be written to flash
pub static PERSIST_CHANNEL: Channel<
    CriticalSectionRawMutex,
    (Role, ButtonSignature),
    PERSIST_CHANNEL_SIZE,
> = Channel::new();

/// Tick clock arming (true) and disarming (false)
///
/// Holds only the latest request, which always matches the scheduler.
pub static TICK_ARMED: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Sleep requested by the controller
pub static SLEEP_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Activity on the IR receiver ended a sleep
pub static WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// One-shot wake trigger, armed before sleeping and fired by the IR task
pub static WAKE_LATCH: WakeLatch = WakeLatch::new();
