//! Linear regression models loaded from TOML files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::ForecastError;
use super::features::{Feature, WeatherFeatures};

/// On-disk model layout.
///
/// ```toml
/// name = "grid_load"
/// intercept = 40.0
///
/// [coefficients]
/// temperature = 0.8
/// hour_of_day = 0.5
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelFile {
    name: String,
    intercept: f64,
    #[serde(default)]
    coefficients: BTreeMap<String, f64>,
}

/// `intercept + Σ coefficient × feature` over named weather features.
///
/// Coefficients are keyed by feature name, so the column order in the
/// model file is irrelevant.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionModel {
    name: String,
    intercept: f64,
    coefficients: Vec<(Feature, f64)>,
}

impl RegressionModel {
    /// Builds a model from already-resolved coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidModel`] if there are no coefficients,
    /// a feature appears twice, or any number is not finite.
    pub fn new(
        name: impl Into<String>,
        intercept: f64,
        coefficients: Vec<(Feature, f64)>,
    ) -> Result<Self, ForecastError> {
        let name = name.into();
        let invalid = |message: String| ForecastError::InvalidModel {
            model: name.clone(),
            message,
        };

        if coefficients.is_empty() {
            return Err(invalid("at least one coefficient is required".into()));
        }
        if !intercept.is_finite() {
            return Err(invalid(format!("intercept must be finite, got {intercept}")));
        }
        for (i, (feature, value)) in coefficients.iter().enumerate() {
            if !value.is_finite() {
                return Err(invalid(format!(
                    "coefficient for {feature} must be finite, got {value}"
                )));
            }
            if coefficients[..i].iter().any(|(f, _)| f == feature) {
                return Err(invalid(format!("duplicate coefficient for {feature}")));
            }
        }

        Ok(Self {
            name,
            intercept,
            coefficients,
        })
    }

    /// Parses a model from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::ModelLoad`] if the file cannot be read and
    /// [`ForecastError::InvalidModel`] if its contents are rejected.
    pub fn from_toml_file(path: &Path) -> Result<Self, ForecastError> {
        let content = fs::read_to_string(path).map_err(|source| ForecastError::ModelLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|err| match err {
            ForecastError::InvalidModel { model, message } => ForecastError::InvalidModel {
                model: format!("{model} ({})", path.display()),
                message,
            },
            other => other,
        })
    }

    /// Parses a model from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidModel`] on malformed TOML, unknown
    /// feature names or non-finite numbers.
    pub fn from_toml_str(s: &str) -> Result<Self, ForecastError> {
        let file: ModelFile = toml::from_str(s).map_err(|e| ForecastError::InvalidModel {
            model: "<unparsed>".to_string(),
            message: e.to_string(),
        })?;

        let coefficients = file
            .coefficients
            .iter()
            .map(|(key, value)| {
                key.parse::<Feature>()
                    .map(|feature| (feature, *value))
                    .map_err(|message| ForecastError::InvalidModel {
                        model: file.name.clone(),
                        message,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(file.name, file.intercept, coefficients)
    }

    /// Model name from the file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constant term.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Feature weights.
    pub fn coefficients(&self) -> &[(Feature, f64)] {
        &self.coefficients
    }

    /// Evaluates the model on one feature vector. The output is raw and may
    /// be negative.
    pub fn predict(&self, features: &WeatherFeatures) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .map(|(feature, weight)| weight * features.value(*feature))
                .sum::<f64>()
    }
}
