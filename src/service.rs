//! Request pipeline: weather lookup, forecasting, then dispatch.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::dispatch::{Allocation, Forecast};
use crate::forecast::{ForecastError, ForecastProvider};
use crate::weather::{WeatherError, WeatherReport, WeatherSource};

/// Failure of any pipeline stage.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// Full, unrounded result for one city.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub weather: WeatherReport,
    pub forecast: Forecast,
    pub allocation: Allocation,
}

/// Runs the weather → forecast → dispatch pipeline.
///
/// Collaborators are injected at construction. A service built with
/// [`PredictionService::uninitialized`] still fetches weather, then fails
/// with [`ForecastError::NotInitialized`].
#[derive(Clone)]
pub struct PredictionService {
    weather: Arc<dyn WeatherSource>,
    forecaster: Option<Arc<dyn ForecastProvider>>,
}

impl PredictionService {
    /// Creates a ready service.
    pub fn new(weather: Arc<dyn WeatherSource>, forecaster: Arc<dyn ForecastProvider>) -> Self {
        Self {
            weather,
            forecaster: Some(forecaster),
        }
    }

    /// Creates a service with no forecast provider installed.
    pub fn uninitialized(weather: Arc<dyn WeatherSource>) -> Self {
        Self {
            weather,
            forecaster: None,
        }
    }

    fn forecaster(&self) -> Result<&dyn ForecastProvider, ForecastError> {
        self.forecaster
            .as_deref()
            .ok_or(ForecastError::NotInitialized)
    }

    /// Produces weather, forecast and allocation for `city`.
    ///
    /// # Errors
    ///
    /// Returns the [`ServiceError`] of the first stage that fails.
    pub async fn predict(&self, city: &str) -> Result<Prediction, ServiceError> {
        let weather = self.weather.fetch(city).await?;
        let w = &weather.features;
        info!(
            city,
            temperature = w.temperature,
            wind_speed = w.wind_speed,
            humidity = w.humidity,
            pressure = w.atmospheric_pressure,
            irradiance = w.solar_irradiance,
            hour = w.hour_of_day,
            weekday = w.day_of_week,
            "weather retrieved"
        );

        let forecast = self.forecaster()?.forecast(&weather.features)?;
        info!(
            city,
            load_kw = forecast.load(),
            solar_kw = forecast.solar(),
            wind_kw = forecast.wind(),
            "forecast generated"
        );

        let allocation = forecast.allocate();
        info!(city, %allocation, "dispatch decided");

        Ok(Prediction {
            weather,
            forecast,
            allocation,
        })
    }
}
