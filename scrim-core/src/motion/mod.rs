//! Motion control
//!
//! Decides what a decoded remote signal means for the screen: learn it,
//! start a motion, abort the running one, or ignore it.

pub mod action;
pub mod controller;
pub mod state;

pub use action::Action;
pub use controller::{IgnoreReason, MotionController, SignalOutcome};
pub use state::{MotionMemory, MotionState};
