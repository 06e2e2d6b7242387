//! Scrim Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits that chip-specific
//! HALs implement for the screen controller. Application code in
//! `scrim-firmware` talks to relays and flash only through these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (scrim-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  scrim-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ scrim-hal-    │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output, wrapped by [`gpio::PolarizedOutput`]
//!   for relays that are driven active-low
//! - [`flash::FlashStorage`] - Persistent key-value storage

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use gpio::{OutputPin, Polarity, PolarizedOutput};
