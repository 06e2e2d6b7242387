//! Configuration loading and persistence
//!
//! Controller settings come from `screen.toml`, embedded at build time and
//! parsed by a small no_std parser. Learned remote buttons live in flash.

pub mod signatures;
pub mod toml;

pub use signatures::{load_signatures, save_signature};
pub use toml::{parse_config, ScreenConfig};
