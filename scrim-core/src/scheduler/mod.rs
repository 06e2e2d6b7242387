//! Deferred action scheduler
//!
//! Runs a single action after a number of clock ticks. The tick clock is
//! the only thing that drives it.

pub mod deferred;

pub use deferred::{DeferredScheduler, PendingAction};
