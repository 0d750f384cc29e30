//! TOML-based application configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::provider::{DEFAULT_REQUEST_ID, DEFAULT_URL};
use crate::series::Period;
use crate::stats::Granularity;

/// Top-level configuration parsed from TOML.
///
/// Every section is optional and falls back to its defaults. Load with
/// [`AppConfig::from_toml_file`] or use [`AppConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Window-search parameters.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Contents of the printed/served report.
    #[serde(default)]
    pub report: ReportConfig,
    /// Provider endpoint settings.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Synthetic demo series settings.
    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

/// Window-search parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Start-point alignment in minutes; must divide 60.
    pub granularity_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: u32::from(Granularity::QUARTER_HOUR.minutes()),
        }
    }
}

/// Contents of the report.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Window lengths (hours) to search in both periods.
    pub durations_hours: Vec<f64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            durations_hours: vec![1.0, 2.0, 3.0],
        }
    }
}

/// Provider endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// JSON-RPC endpoint URL.
    pub url: String,
    /// Request timeout in seconds (must be > 0).
    pub timeout_secs: u64,
    /// JSON-RPC request id.
    pub request_id: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout_secs: 30,
            request_id: DEFAULT_REQUEST_ID,
        }
    }
}

/// Synthetic demo series settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticConfig {
    /// Random seed for the generated prices.
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"engine.granularity_minutes"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl AppConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Alignment grid derived from `engine.granularity_minutes`.
    ///
    /// Falls back to quarter hours when the value is invalid; call
    /// [`AppConfig::validate`] first to surface that as an error.
    pub fn granularity(&self) -> Granularity {
        Granularity::from_minutes(self.engine.granularity_minutes).unwrap_or_default()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if Granularity::from_minutes(self.engine.granularity_minutes).is_none() {
            errors.push(ConfigError {
                field: "engine.granularity_minutes".into(),
                message: format!(
                    "must be in 1..=60 and divide 60, got {}",
                    self.engine.granularity_minutes
                ),
            });
        }

        // Report durations are searched in both periods.
        let max_hours = Period::Day.capacity_hours().max(Period::Night.capacity_hours());
        for (i, d) in self.report.durations_hours.iter().enumerate() {
            if !d.is_finite() || *d <= 0.0 || *d > max_hours {
                errors.push(ConfigError {
                    field: format!("report.durations_hours[{i}]"),
                    message: format!("must be > 0 and <= {max_hours}, got {d}"),
                });
            }
        }

        let fetch = &self.fetch;
        if fetch.url.trim().is_empty() {
            errors.push(ConfigError {
                field: "fetch.url".into(),
                message: "must not be empty".into(),
            });
        }
        if fetch.timeout_secs == 0 {
            errors.push(ConfigError {
                field: "fetch.timeout_secs".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}
