//! Session configuration read from environment variables.

use std::path::PathBuf;

use crate::error::AppError;

/// Ticks per simulated second when `DAYBREAK_TICK_HZ` is unset.
pub const DEFAULT_TICK_HZ: u16 = 60;

/// RNG seed when `DAYBREAK_SEED` is unset.
pub const DEFAULT_SEED: u64 = 0x5EED;

/// Simulated-time cap when `DAYBREAK_MAX_SECONDS` is unset.
pub const DEFAULT_MAX_SECONDS: f32 = 900.0;

/// Everything the binary needs to start a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Content YAML; the embedded default when `None`.
    pub content_path: Option<PathBuf>,
    /// Input script YAML; the embedded demo when `None`.
    pub script_path: Option<PathBuf>,
    /// Host ticks per simulated second.
    pub tick_hz: u16,
    /// Seed for chatter timing and picks.
    pub seed: u64,
    /// Pace ticks against the wall clock instead of running flat out.
    pub realtime: bool,
    /// Simulated seconds after which playback stops regardless.
    pub max_seconds: f32,
    /// Emit JSON log lines.
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_path: None,
            script_path: None,
            tick_hz: DEFAULT_TICK_HZ,
            seed: DEFAULT_SEED,
            realtime: false,
            max_seconds: DEFAULT_MAX_SECONDS,
            log_json: false,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first variable with an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first variable with an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let tick_hz = match lookup("DAYBREAK_TICK_HZ") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|hz| *hz > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "DAYBREAK_TICK_HZ must be a positive integer, got {raw:?}"
                    ))
                })?,
            None => defaults.tick_hz,
        };
        let seed = match lookup("DAYBREAK_SEED") {
            Some(raw) => parse_seed(&raw).ok_or_else(|| {
                AppError::Config(format!(
                    "DAYBREAK_SEED must be a decimal or 0x-prefixed integer, got {raw:?}"
                ))
            })?,
            None => defaults.seed,
        };
        let max_seconds = match lookup("DAYBREAK_MAX_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|s| s.is_finite() && *s > 0.0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "DAYBREAK_MAX_SECONDS must be a positive number, got {raw:?}"
                    ))
                })?,
            None => defaults.max_seconds,
        };

        Ok(Self {
            content_path: lookup("DAYBREAK_CONTENT")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            script_path: lookup("DAYBREAK_SCRIPT")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            tick_hz,
            seed,
            realtime: flag(&lookup, "DAYBREAK_REALTIME")?,
            max_seconds,
            log_json: flag(&lookup, "DAYBREAK_LOG_JSON")?,
        })
    }

    /// Simulated seconds per tick.
    #[must_use]
    pub fn dt(&self) -> f32 {
        1.0 / f32::from(self.tick_hz)
    }
}

fn parse_seed(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<bool, AppError> {
    match lookup(key).as_deref().map(str::trim) {
        None | Some("" | "0" | "false") => Ok(false),
        Some("1" | "true") => Ok(true),
        Some(other) => Err(AppError::Config(format!(
            "{key} must be 0, 1, true or false, got {other:?}"
        ))),
    }
}
