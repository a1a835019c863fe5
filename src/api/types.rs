//! API response and query types.
//!
//! Field names are the public wire contract consumed by the dashboard.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dispatch::round2;
use crate::service::Prediction;

/// Cloud cover reported to clients; the weather lookup does not supply one.
pub const DEFAULT_CLOUD_COVER: u8 = 50;

/// Query parameters for `/predict`.
#[derive(Debug, Default, PartialEq)]
pub struct PredictQuery {
    /// City name; trimmed before validation.
    pub city: Option<String>,
}

impl PredictQuery {
    /// Picks the parameters out of decoded `key=value` pairs.
    ///
    /// A repeated `city` keeps its first value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let city = pairs
            .into_iter()
            .find(|(key, _)| key == "city")
            .map(|(_, value)| value);
        Self { city }
    }
}

/// Forecast and allocation for one city, rounded for display.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Forecast load (kW).
    pub predicted_load: f64,
    /// Forecast solar generation (kW).
    pub predicted_solar: f64,
    /// Forecast wind generation (kW).
    pub predicted_wind: f64,
    /// Solar consumed locally (kW).
    pub solar_used: f64,
    /// Wind consumed locally (kW).
    pub wind_used: f64,
    /// Drawn from the grid (kW).
    pub grid_import: f64,
    /// Pushed to the grid (kW).
    pub grid_export: f64,
    /// Conditions the forecast was based on.
    pub weather: WeatherSummary,
}

/// Weather block of [`PredictResponse`].
#[derive(Debug, Serialize)]
pub struct WeatherSummary {
    pub temperature: f64,
    pub wind_speed: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub solar_radiance: f64,
    pub cloud_cover: u8,
}

impl From<&Prediction> for PredictResponse {
    fn from(p: &Prediction) -> Self {
        let allocation = p.allocation.rounded();
        let w = &p.weather.features;
        Self {
            predicted_load: round2(p.forecast.load()),
            predicted_solar: round2(p.forecast.solar()),
            predicted_wind: round2(p.forecast.wind()),
            solar_used: allocation.solar_used,
            wind_used: allocation.wind_used,
            grid_import: allocation.grid_import,
            grid_export: allocation.grid_export,
            weather: WeatherSummary {
                temperature: w.temperature,
                wind_speed: w.wind_speed,
                humidity: w.humidity,
                pressure: w.atmospheric_pressure,
                solar_radiance: w.solar_irradiance,
                cloud_cover: DEFAULT_CLOUD_COVER,
            },
        }
    }
}

/// Service banner returned by `/`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Error body for every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error category.
    pub error: String,
    /// Human-readable explanation.
    pub message: String,
}
