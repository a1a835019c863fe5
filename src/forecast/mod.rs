//! Forecast provider: turns weather features into a load/solar/wind forecast.

mod features;
mod model;
mod provider;

use std::path::PathBuf;

use thiserror::Error;

use crate::dispatch::{DispatchError, Forecast};

pub use features::{Feature, WeatherFeatures};
pub use model::RegressionModel;
pub use provider::{DEFAULT_WIND_SCALE, ModelForecaster, ModelSummary};

/// Anything that can forecast load and renewable generation from weather.
///
/// Implementations must return finite, non-negative values; the returned
/// [`Forecast`] enforces this.
pub trait ForecastProvider: Send + Sync {
    /// Forecasts load, solar and wind (kW) for one feature vector.
    ///
    /// # Errors
    ///
    /// Returns a [`ForecastError`] if the provider cannot produce a valid
    /// forecast.
    fn forecast(&self, features: &WeatherFeatures) -> Result<Forecast, ForecastError>;
}

/// Forecast provider failures.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// No provider has been installed.
    #[error("Prediction service not initialized")]
    NotInitialized,
    /// A model file could not be read.
    #[error("Model file not found: cannot read \"{}\": {source}", .path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A model file was read but rejected.
    #[error("Failed to load model {model}: {message}")]
    InvalidModel { model: String, message: String },
    /// A model produced NaN or infinity.
    #[error("{model} prediction failed: result is not a finite number")]
    NonFinitePrediction { model: &'static str },
    /// The provider produced values the dispatch engine rejects.
    #[error("Prediction service error: {0}")]
    Rejected(#[from] DispatchError),
}
