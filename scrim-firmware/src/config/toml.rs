//! Simple TOML parser for the screen configuration
//!
//! This is a minimal TOML parser that handles only the subset used by
//! `screen.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (float, integer, boolean)
//! - [section] headers
//! - Comments (# ...)
//!
//! The build script validates the file with a complete TOML parser, so
//! anything outside this subset never reaches the device.

use heapless::String as HString;

use scrim_core::config::{ControllerConfig, OutputConfig};

/// Longest section or key name reported in errors
pub const MAX_NAME_LEN: usize = 32;

/// Parse error
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Section header that is not part of the configuration
    UnknownSection(HString<MAX_NAME_LEN>),
    /// Key that does not belong to its section
    UnknownKey(HString<MAX_NAME_LEN>),
    /// Value of the wrong type, or a key outside any section
    InvalidValue { line: usize },
}

/// Everything configurable in `screen.toml`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenConfig {
    /// Timing and potentiometer settings
    pub controller: ControllerConfig,
    /// Output polarities
    pub outputs: OutputConfig,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Root,
    Timing,
    Potentiometer,
    Outputs,
}

/// Parse TOML configuration into a [`ScreenConfig`]
///
/// Keys that are not present keep their default value.
pub fn parse_config(input: &str) -> Result<ScreenConfig, ParseError> {
    let mut config = ScreenConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let line_no = index + 1;
        let (key, value) =
            parse_key_value(line).ok_or(ParseError::InvalidValue { line: line_no })?;
        apply_value(section, key, value, &mut config).map_err(|e| match e {
            ParseError::InvalidValue { .. } => ParseError::InvalidValue { line: line_no },
            other => other,
        })?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "timing" => Ok(Section::Timing),
        "potentiometer" => Ok(Section::Potentiometer),
        "outputs" => Ok(Section::Outputs),
        other => Err(ParseError::UnknownSection(truncated(other))),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments; no string values, so no quoting to respect
    let value = match value.find('#') {
        Some(hash_pos) => value[..hash_pos].trim(),
        None => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue { line: 0 })
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue { line: 0 })
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue { line: 0 }),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut ScreenConfig,
) -> Result<(), ParseError> {
    let controller = &mut config.controller;
    let outputs = &mut config.outputs;

    match (section, key) {
        (Section::Timing, "tick_rate_hz") => controller.tick_rate_hz = parse_float(value)?,
        (Section::Timing, "full_travel_seconds") => {
            controller.full_travel_seconds = parse_float(value)?
        }
        (Section::Timing, "lower_step_seconds") => {
            controller.lower_step_seconds = parse_float(value)?
        }
        (Section::Timing, "idle_timeout_seconds") => {
            controller.idle_timeout_seconds = parse_float(value)?
        }
        (Section::Potentiometer, "programming_threshold") => {
            controller.programming_threshold = parse_int(value)?
        }
        (Section::Potentiometer, "programming_lower_threshold") => {
            controller.programming_lower_threshold = parse_int(value)?
        }
        (Section::Potentiometer, "assume_initially_hidden") => {
            controller.assume_initially_hidden = parse_bool(value)?
        }
        (Section::Outputs, "relays_active_low") => outputs.relays_active_low = parse_bool(value)?,
        (Section::Outputs, "indicator_active_low") => {
            outputs.indicator_active_low = parse_bool(value)?
        }
        (Section::Root, _) => return Err(ParseError::InvalidValue { line: 0 }),
        (_, other) => return Err(ParseError::UnknownKey(truncated(other))),
    }

    Ok(())
}

/// Copy a name into a fixed-capacity string, cutting it if too long
fn truncated(name: &str) -> HString<MAX_NAME_LEN> {
    let mut out = HString::new();
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_embedded_config() {
        let config = parse_config(include_str!("../../screen.toml")).unwrap();
        assert_eq!(config, ScreenConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("[timing]\nfull_travel_seconds = 30 # short screen\n").unwrap();
        assert_eq!(config.controller.full_travel_seconds, 30.0);
        assert_eq!(config.controller.lower_step_seconds, 0.5);
    }

    #[test]
    fn test_reports_line_of_bad_value() {
        let err = parse_config("[outputs]\n\nrelays_active_low = maybe\n").unwrap_err();
        assert_eq!(err, ParseError::InvalidValue { line: 3 });
    }

    #[test]
    fn test_rejects_unknown_names() {
        match parse_config("[motor]\n").unwrap_err() {
            ParseError::UnknownSection(name) => assert_eq!(name.as_str(), "motor"),
            other => panic!("unexpected error: {:?}", other),
        }

        match parse_config("[timing]\nspeed = 3\n").unwrap_err() {
            ParseError::UnknownKey(name) => assert_eq!(name.as_str(), "speed"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
