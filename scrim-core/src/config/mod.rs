//! Configuration types
//!
//! Board-agnostic configuration structures. Defaults suit a typical
//! tubular screen motor with a 31 Hz tick; firmware overrides them from
//! its embedded configuration file.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
