//! Three-model forecaster: load, solar and wind.

use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use super::features::WeatherFeatures;
use super::model::RegressionModel;
use super::{ForecastError, ForecastProvider};
use crate::dispatch::Forecast;

/// Default multiplier applied to the raw wind model output.
pub const DEFAULT_WIND_SCALE: f64 = 0.4;

/// Forecasts load, solar and wind from weather with one regression model each.
///
/// Raw outputs are floored at zero. Wind is scaled by `wind_scale` before
/// flooring.
#[derive(Debug, Clone)]
pub struct ModelForecaster {
    load: RegressionModel,
    solar: RegressionModel,
    wind: RegressionModel,
    wind_scale: f64,
}

impl ModelForecaster {
    /// Creates a forecaster using [`DEFAULT_WIND_SCALE`].
    pub fn new(load: RegressionModel, solar: RegressionModel, wind: RegressionModel) -> Self {
        Self {
            load,
            solar,
            wind,
            wind_scale: DEFAULT_WIND_SCALE,
        }
    }

    /// Overrides the wind output multiplier.
    pub fn with_wind_scale(mut self, wind_scale: f64) -> Self {
        self.wind_scale = wind_scale;
        self
    }

    /// Loads all three models from TOML files.
    ///
    /// # Errors
    ///
    /// Returns the first model loading error encountered.
    pub fn from_paths(load: &Path, solar: &Path, wind: &Path) -> Result<Self, ForecastError> {
        let load = load_logged("grid load", load)?;
        let solar = load_logged("solar", solar)?;
        let wind = load_logged("wind", wind)?;
        Ok(Self::new(load, solar, wind))
    }

    /// Multiplier applied to the wind model.
    pub fn wind_scale(&self) -> f64 {
        self.wind_scale
    }

    /// Summary of the loaded models for diagnostics.
    pub fn describe(&self) -> ModelSummary<'_> {
        ModelSummary(self)
    }
}

fn load_logged(kind: &str, path: &Path) -> Result<RegressionModel, ForecastError> {
    let model = RegressionModel::from_toml_file(path)?;
    info!(
        model = model.name(),
        path = %path.display(),
        coefficients = model.coefficients().len(),
        "loaded {kind} model"
    );
    Ok(model)
}

fn checked(model: &'static str, value: f64) -> Result<f64, ForecastError> {
    if value.is_finite() {
        Ok(value.max(0.0))
    } else {
        Err(ForecastError::NonFinitePrediction { model })
    }
}

impl ForecastProvider for ModelForecaster {
    fn forecast(&self, features: &WeatherFeatures) -> Result<Forecast, ForecastError> {
        let load = checked("load", self.load.predict(features))?;
        let solar = checked("solar", self.solar.predict(features))?;
        let wind = checked("wind", self.wind.predict(features) * self.wind_scale)?;
        debug!(load, solar, wind, "model outputs");
        Ok(Forecast::new(load, solar, wind)?)
    }
}

/// Display adapter listing each model's name, intercept and weights.
pub struct ModelSummary<'a>(&'a ModelForecaster);

impl fmt::Display for ModelSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fc = self.0;
        for (role, model) in [("load", &fc.load), ("solar", &fc.solar), ("wind", &fc.wind)] {
            writeln!(
                f,
                "{role:<5} | {} (intercept={:.4}, {} coefficients)",
                model.name(),
                model.intercept(),
                model.coefficients().len()
            )?;
            for (feature, weight) in model.coefficients() {
                writeln!(f, "      |   {feature:<22} {weight:>10.4}")?;
            }
        }
        write!(f, "wind scale: {}", fc.wind_scale)
    }
}
