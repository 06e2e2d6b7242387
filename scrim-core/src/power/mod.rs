//! Power management
//!
//! Puts the controller to sleep after a period without remote signals and
//! provides the one-shot latch that wakes it up again.

pub mod latch;
pub mod manager;

pub use latch::WakeLatch;
pub use manager::PowerManager;
