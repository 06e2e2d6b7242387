//! Hardware abstraction traits
//!
//! These traits define the interface between the controller logic
//! and hardware-specific implementations.

pub mod clock;
pub mod outputs;
pub mod power;
pub mod storage;

pub use clock::TickClock;
pub use outputs::MotionOutputs;
pub use power::PowerControl;
pub use storage::{SignatureStore, StoreError};
