//! Configuration loader for the `sensorwatch` monitoring service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.

use std::env;

use anyhow::{anyhow, Result};

use crate::models::{RangeBound, RangeCatalog};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional float environment variable with a default value.
macro_rules! parse_env_f64 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<f64>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Readings API base URL.
    pub api_url: String,

    /// Alert sink base URL.
    pub sink_url: String,

    /// Seconds between poll cycles.
    pub poll_interval_secs: u32,

    /// Trailing window of readings requested each cycle, in hours.
    pub lookback_hours: u32,

    /// How long a detected alert stays in the display window, in seconds.
    pub visibility_secs: u32,

    /// Per-metric inclusive bounds defining normal operation.
    pub ranges: RangeCatalog,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `SENSOR_API_URL` – readings API base URL
/// - `ALERT_SINK_URL` – alert sink base URL
///
/// Optional:
/// - `POLL_INTERVAL_SECS` – seconds between polls (default: 5)
/// - `LOOKBACK_HOURS` – trailing window requested per poll (default: 8)
/// - `ALERT_VISIBILITY_SECS` – alert display time-to-live (default: 10)
/// - `TEMPERATURE_MIN` / `TEMPERATURE_MAX` (default: 20.00 / 29.99)
/// - `PRESSURE_MIN` / `PRESSURE_MAX` (default: 1000.0 / 1049.9)
/// - `HUMIDITY_MIN` / `HUMIDITY_MAX` (default: 30.0 / 99.9)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let api_url = require_env!("SENSOR_API_URL");
    let sink_url = require_env!("ALERT_SINK_URL");
    let poll_interval_secs = parse_env_u32!("POLL_INTERVAL_SECS", 5);
    let lookback_hours = parse_env_u32!("LOOKBACK_HOURS", 8);
    let visibility_secs = parse_env_u32!("ALERT_VISIBILITY_SECS", 10);

    let defaults = RangeCatalog::default();
    let ranges = RangeCatalog {
        temperature: RangeBound {
            min: parse_env_f64!("TEMPERATURE_MIN", defaults.temperature.min),
            max: parse_env_f64!("TEMPERATURE_MAX", defaults.temperature.max),
        },
        pressure: RangeBound {
            min: parse_env_f64!("PRESSURE_MIN", defaults.pressure.min),
            max: parse_env_f64!("PRESSURE_MAX", defaults.pressure.max),
        },
        humidity: RangeBound {
            min: parse_env_f64!("HUMIDITY_MIN", defaults.humidity.min),
            max: parse_env_f64!("HUMIDITY_MAX", defaults.humidity.max),
        },
    };

    Ok(Config {
        api_url,
        sink_url,
        poll_interval_secs,
        lookback_hours,
        visibility_secs,
        ranges,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  SENSOR_API_URL       : {}", self.api_url);
        tracing::info!("  ALERT_SINK_URL       : {}", self.sink_url);
        tracing::info!("  POLL_INTERVAL_SECS   : {}", self.poll_interval_secs);
        tracing::info!("  LOOKBACK_HOURS       : {}", self.lookback_hours);
        tracing::info!("  ALERT_VISIBILITY_SECS: {}", self.visibility_secs);
        tracing::info!(
            "  Temperature range    : {:.2}..{:.2}",
            self.ranges.temperature.min,
            self.ranges.temperature.max
        );
        tracing::info!(
            "  Pressure range       : {:.1}..{:.1}",
            self.ranges.pressure.min,
            self.ranges.pressure.max
        );
        tracing::info!(
            "  Humidity range       : {:.1}..{:.1}",
            self.ranges.humidity.min,
            self.ranges.humidity.max
        );
    }
}
