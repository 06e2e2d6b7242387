//! Learned remote-control buttons
//!
//! Holds the raise and lower button signatures, compares decoded signals
//! against them and writes every change straight through to storage.

pub mod buttons;
pub mod signature;

pub use buttons::{ButtonRegistry, LoadReport, LoadStatus};
pub use signature::{ButtonSignature, RecordError, Role, RECORD_LEN};
