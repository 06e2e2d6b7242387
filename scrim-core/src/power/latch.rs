//! One-shot wake latch
//!
//! Armed right before the controller halts, released by the first activity
//! on the IR receiver line. Only the first edge after arming wakes the
//! controller; later edges are ordinary signal traffic.
//!
//! Arming and firing happen on the same core from cooperatively scheduled
//! tasks, so plain load/store atomics are sufficient (and available on
//! Cortex-M0+, which has no compare-and-swap).

use core::sync::atomic::{AtomicBool, Ordering};

/// Latch that fires at most once per arming
pub struct WakeLatch {
    armed: AtomicBool,
}

impl WakeLatch {
    /// Create a disarmed latch
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
        }
    }

    /// Arm the latch for the next fire
    pub fn arm(&self) {
        self.armed.store(true, Ordering::Release);
    }

    /// Disarm without firing
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    /// Fire the latch
    ///
    /// Returns true exactly once per arming. The latch is disarmed
    /// afterwards.
    pub fn fire(&self) -> bool {
        if self.armed.load(Ordering::Acquire) {
            self.armed.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Check if the latch is armed
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }
}

impl Default for WakeLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disarmed() {
        let latch = WakeLatch::new();
        assert!(!latch.is_armed());
        assert!(!latch.fire());
    }

    #[test]
    fn test_fires_once_per_arming() {
        let latch = WakeLatch::new();
        latch.arm();
        assert!(latch.fire());
        assert!(!latch.fire());
        assert!(!latch.is_armed());

        latch.arm();
        assert!(latch.fire());
    }

    #[test]
    fn test_disarm() {
        let latch = WakeLatch::new();
        latch.arm();
        latch.disarm();
        assert!(!latch.fire());
    }
}
