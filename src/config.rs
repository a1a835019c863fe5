//! TOML-based service configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::forecast::DEFAULT_WIND_SCALE;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Top-level service configuration parsed from TOML.
///
/// Every section is optional and falls back to the defaults below. Load from
/// TOML with [`ServiceConfig::from_toml_file`] or start from
/// [`ServiceConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Weather API settings.
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Regression model files.
    #[serde(default)]
    pub models: ModelsConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind host name or address.
    pub host: String,
    /// Bind port (must be > 0).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Weather API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    /// Current-conditions endpoint URL.
    pub api_url: String,
    /// API key; usually supplied through [`API_KEY_ENV`].
    pub api_key: String,
    /// Request timeout in seconds (must be > 0).
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_url: "http://api.weatherapi.com/v1/current.json".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl WeatherConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Regression model files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelsConfig {
    /// Grid load model path.
    pub load_path: PathBuf,
    /// Solar generation model path.
    pub solar_path: PathBuf,
    /// Wind generation model path.
    pub wind_path: PathBuf,
    /// Multiplier applied to the wind model output (>= 0).
    pub wind_scale: f64,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            load_path: PathBuf::from("models/grid_load.toml"),
            solar_path: PathBuf::from("models/solar.toml"),
            wind_path: PathBuf::from("models/wind.toml"),
            wind_scale: DEFAULT_WIND_SCALE,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"server.port"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ServiceConfig {
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

    /// Replaces the API key when `key` is set and non-empty.
    pub fn override_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.weather.api_key = key;
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let srv = &self.server;
        if srv.host.trim().is_empty() {
            errors.push(ConfigError {
                field: "server.host".into(),
                message: "must not be empty".into(),
            });
        }
        if srv.port == 0 {
            errors.push(ConfigError {
                field: "server.port".into(),
                message: "must be > 0".into(),
            });
        }

        let w = &self.weather;
        if !(w.api_url.starts_with("http://") || w.api_url.starts_with("https://")) {
            errors.push(ConfigError {
                field: "weather.api_url".into(),
                message: format!("must be an http(s) URL, got \"{}\"", w.api_url),
            });
        }
        if w.api_key.trim().is_empty() {
            errors.push(ConfigError {
                field: "weather.api_key".into(),
                message: format!("must be set (or export {API_KEY_ENV})"),
            });
        }
        if w.timeout_secs == 0 {
            errors.push(ConfigError {
                field: "weather.timeout_secs".into(),
                message: "must be > 0".into(),
            });
        }

        let m = &self.models;
        if !m.wind_scale.is_finite() || m.wind_scale < 0.0 {
            errors.push(ConfigError {
                field: "models.wind_scale".into(),
                message: format!("must be a finite number >= 0, got {}", m.wind_scale),
            });
        }

        errors
    }
}
