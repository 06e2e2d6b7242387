//! Build script for scrim-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates screen.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted per section, with their expected value kind
const SCHEMA: &[(&str, &[(&str, Kind)])] = &[
    (
        "timing",
        &[
            ("tick_rate_hz", Kind::Number),
            ("full_travel_seconds", Kind::Number),
            ("lower_step_seconds", Kind::Number),
            ("idle_timeout_seconds", Kind::Number),
        ],
    ),
    (
        "potentiometer",
        &[
            ("programming_threshold", Kind::Integer),
            ("programming_lower_threshold", Kind::Integer),
            ("assume_initially_hidden", Kind::Bool),
        ],
    ),
    (
        "outputs",
        &[
            ("relays_active_low", Kind::Bool),
            ("indicator_active_low", Kind::Bool),
        ],
    ),
];

#[derive(Clone, Copy)]
enum Kind {
    Number,
    Integer,
    Bool,
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate screen.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=screen.toml");

    let config_path = Path::new("screen.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: screen.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds screen.toml as its configuration.           ║\n\
            ║  Please create one in the scrim-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read screen.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in screen.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = validate_schema(&config);
    errors.extend(validate_values(&config));

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in screen.toml                     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=screen.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check sections, keys and value types against the schema
///
/// The firmware parser only understands flat sections with scalar values,
/// so anything else is rejected here rather than ignored on the device.
fn validate_schema(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let root = match config.as_table() {
        Some(t) => t,
        None => return errors,
    };

    for (section, value) in root {
        let keys = match SCHEMA.iter().find(|(name, _)| name == section) {
            Some((_, keys)) => keys,
            None => {
                errors.push(format!("unknown section [{}]", section));
                continue;
            }
        };

        let table = match value.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("[{}] must be a table", section));
                continue;
            }
        };

        for (key, value) in table {
            let kind = match keys.iter().find(|(name, _)| name == key) {
                Some((_, kind)) => *kind,
                None => {
                    errors.push(format!("[{}] unknown key '{}'", section, key));
                    continue;
                }
            };

            let ok = match kind {
                Kind::Number => value.is_float() || value.is_integer(),
                Kind::Integer => value.is_integer(),
                Kind::Bool => value.is_bool(),
            };
            if !ok {
                let expected = match kind {
                    Kind::Number => "a number",
                    Kind::Integer => "an integer",
                    Kind::Bool => "true or false",
                };
                errors.push(format!("[{}] {} must be {}", section, key, expected));
            }
        }
    }

    errors
}

/// Check value ranges
fn validate_values(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let number = |section: &str, key: &str| -> Option<f64> {
        let value = config.get(section)?.get(key)?;
        value.as_float().or_else(|| value.as_integer().map(|i| i as f64))
    };
    let integer = |section: &str, key: &str| -> Option<i64> {
        config.get(section)?.get(key)?.as_integer()
    };

    for key in [
        "tick_rate_hz",
        "full_travel_seconds",
        "lower_step_seconds",
        "idle_timeout_seconds",
    ] {
        if let Some(value) = number("timing", key) {
            if !(value > 0.0) || !value.is_finite() {
                errors.push(format!("[timing] {} must be positive", key));
            }
        }
    }

    let threshold = integer("potentiometer", "programming_threshold").unwrap_or(200);
    let lower = integer("potentiometer", "programming_lower_threshold").unwrap_or(10);
    if !(0..=1024).contains(&threshold) {
        errors.push("[potentiometer] programming_threshold must be 0-1024".to_string());
    }
    if lower < 0 || lower > threshold {
        errors.push(
            "[potentiometer] programming_lower_threshold must be 0-programming_threshold"
                .to_string(),
        );
    }

    errors
}
