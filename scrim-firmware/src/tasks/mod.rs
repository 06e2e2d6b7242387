//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod controller;
pub mod ir;
pub mod persist;
pub mod tick;

pub use controller::controller_task;
pub use ir::ir_task;
pub use persist::persist_task;
pub use tick::tick_task;
