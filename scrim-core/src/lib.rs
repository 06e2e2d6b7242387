//! Board-agnostic core logic for the screen controller firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (output lines, tick clock, power, storage)
//! - Deferred action scheduler driven by the tick clock
//! - Button registry holding the learned remote signatures
//! - Motion controller (learning, start, abort and ignore decisions)
//! - Idle-to-sleep power management
//! - Configuration type definitions
//! - NEC infrared frame decoder

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod decoder;
pub mod motion;
pub mod power;
pub mod registry;
pub mod scheduler;
pub mod sensor;
pub mod traits;

pub use controller::{ControllerError, ScreenController};
