//! Infrared frame decoding
//!
//! Turns the edge timings of a demodulating IR receiver into
//! [`ButtonSignature`](crate::registry::ButtonSignature)s. Only the NEC
//! protocol is supported.

pub mod nec;

pub use nec::{NecDecoder, NecFrame, NEC_PROTOCOL};
