//! Current-weather lookup by city name.

mod client;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Local, Timelike};
use serde::Deserialize;
use thiserror::Error;

use crate::forecast::WeatherFeatures;

pub use client::WeatherApiClient;

/// Scale applied to the UV index to approximate irradiance in W/m².
pub const UV_TO_IRRADIANCE: f64 = 100.0;

/// Source of current weather for a city.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetches current conditions for `city`.
    ///
    /// # Errors
    ///
    /// Returns a [`WeatherError`] if the lookup fails.
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

/// Weather lookup result: the model features plus request metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// City as requested.
    pub city: String,
    /// Server local time when the report was built.
    pub timestamp: DateTime<Local>,
    /// Model inputs.
    pub features: WeatherFeatures,
}

/// Weather lookup failures. Messages are user-facing.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Failed to connect to WeatherAPI. Please check your internet connection.")]
    Connect,
    #[error("WeatherAPI request timed out. Please try again.")]
    Timeout,
    #[error("Invalid city name: {0}. Please check the spelling.")]
    InvalidCity(String),
    #[error("WeatherAPI authentication failed. Please check your API key.")]
    Unauthorized,
    #[error("WeatherAPI access forbidden. Your API key may have exceeded its quota.")]
    Forbidden,
    #[error("WeatherAPI error: {0}")]
    Status(u16),
    #[error("Unexpected WeatherAPI response format: {0}")]
    Format(String),
    #[error("Weather service error: {0}")]
    Request(String),
}

impl WeatherError {
    /// Maps a non-success HTTP status to an error.
    pub fn from_status(status: u16, city: &str) -> Self {
        match status {
            400 => WeatherError::InvalidCity(city.to_string()),
            401 => WeatherError::Unauthorized,
            403 => WeatherError::Forbidden,
            other => WeatherError::Status(other),
        }
    }
}

/// `current` block of a WeatherAPI response. Missing fields read as zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub wind_kph: f64,
    pub humidity: f64,
    pub pressure_mb: f64,
    pub uv: f64,
}

impl CurrentConditions {
    /// Builds the model feature vector using `now` for calendar fields.
    pub fn features_at(&self, now: &DateTime<Local>) -> WeatherFeatures {
        WeatherFeatures {
            temperature: self.temp_c,
            wind_speed: self.wind_kph,
            humidity: self.humidity,
            atmospheric_pressure: self.pressure_mb,
            solar_irradiance: self.uv * UV_TO_IRRADIANCE,
            hour_of_day: now.hour(),
            day_of_week: now.weekday().num_days_from_monday(),
        }
    }
}
