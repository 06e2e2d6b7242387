//! RP2040-specific HAL for the screen controller firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `scrim-hal` traits, plus RP2040-specific functionality:
//!
//! - GPIO outputs for the relays and the activity indicator
//! - Potentiometer sampling on one ADC channel
//! - Flash storage driver (implements `scrim_hal::FlashStorage`)

#![no_std]

pub mod adc;
pub mod flash;
pub mod gpio;

// Re-export shared traits from scrim-hal for convenience
pub use scrim_hal::{FlashStorage as FlashStorageTrait, StorageKey};
