//! Dispatch input and output types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised before an allocation is computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// An input was NaN, infinite, or negative.
    #[error("invalid argument: {field} must be a finite, non-negative number of kW (got {value})")]
    InvalidArgument {
        /// Name of the offending input.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// A broken conservation or sign rule, reported by [`Allocation::check`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("{field} is negative ({value} kW)")]
    Negative { field: &'static str, value: f64 },
    #[error("grid import ({import_kw} kW) and export ({export_kw} kW) are both positive")]
    BothGridFlows { import_kw: f64, export_kw: f64 },
    #[error("supplied power {supplied_kw} kW does not match load {load_kw} kW")]
    LoadNotMet { supplied_kw: f64, load_kw: f64 },
    #[error("accounted generation {accounted_kw} kW does not match generation {generated_kw} kW")]
    GenerationNotConserved { accounted_kw: f64, generated_kw: f64 },
    #[error("{source_name} used {used_kw} kW but only {available_kw} kW was available")]
    OverUsed {
        source_name: &'static str,
        used_kw: f64,
        available_kw: f64,
    },
}

/// Validated load and generation forecast for one point in time (kW).
///
/// Construct with [`Forecast::new`]; every field is finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    load: f64,
    solar: f64,
    wind: f64,
}

impl Forecast {
    /// Validates and wraps a `(load, solar, wind)` triple.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidArgument`] if any value is NaN,
    /// infinite or negative, or if `solar + wind` overflows.
    pub fn new(load: f64, solar: f64, wind: f64) -> Result<Self, DispatchError> {
        let load = non_negative("load", load)?;
        let solar = non_negative("solar", solar)?;
        let wind = non_negative("wind", wind)?;
        non_negative("solar + wind", solar + wind)?;
        Ok(Self { load, solar, wind })
    }

    /// Predicted demand (kW).
    pub fn load(&self) -> f64 {
        self.load
    }

    /// Predicted solar generation (kW).
    pub fn solar(&self) -> f64 {
        self.solar
    }

    /// Predicted wind generation (kW).
    pub fn wind(&self) -> f64 {
        self.wind
    }

    /// Combined renewable generation (kW).
    pub fn renewable_total(&self) -> f64 {
        self.solar + self.wind
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, DispatchError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DispatchError::InvalidArgument { field, value })
    }
}

/// How forecast generation covers forecast load (kW).
///
/// Values returned by [`Forecast::allocate`] are unrounded; call
/// [`Allocation::rounded`] only when formatting for output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Allocation {
    /// Solar generation consumed by the load.
    pub solar_used: f64,
    /// Wind generation consumed by the load.
    pub wind_used: f64,
    /// Deficit drawn from the grid.
    pub grid_import: f64,
    /// Surplus pushed to the grid.
    pub grid_export: f64,
}

impl Allocation {
    /// Returns a copy with every field rounded to two decimal places.
    pub fn rounded(&self) -> Self {
        Self {
            solar_used: round2(self.solar_used),
            wind_used: round2(self.wind_used),
            grid_import: round2(self.grid_import),
            grid_export: round2(self.grid_export),
        }
    }

    /// Checks this allocation against the forecast it was computed from.
    ///
    /// `tolerance_kw` bounds the absolute error accepted on each equality.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check(&self, forecast: &Forecast, tolerance_kw: f64) -> Result<(), InvariantViolation> {
        for (field, value) in [
            ("solar_used", self.solar_used),
            ("wind_used", self.wind_used),
            ("grid_import", self.grid_import),
            ("grid_export", self.grid_export),
        ] {
            if value < 0.0 {
                return Err(InvariantViolation::Negative { field, value });
            }
        }

        if self.grid_import > tolerance_kw && self.grid_export > tolerance_kw {
            return Err(InvariantViolation::BothGridFlows {
                import_kw: self.grid_import,
                export_kw: self.grid_export,
            });
        }

        let supplied = self.solar_used + self.wind_used + self.grid_import;
        if (supplied - forecast.load()).abs() > tolerance_kw {
            return Err(InvariantViolation::LoadNotMet {
                supplied_kw: supplied,
                load_kw: forecast.load(),
            });
        }

        let accounted = self.solar_used + self.wind_used + self.grid_export;
        if (accounted - forecast.renewable_total()).abs() > tolerance_kw {
            return Err(InvariantViolation::GenerationNotConserved {
                accounted_kw: accounted,
                generated_kw: forecast.renewable_total(),
            });
        }

        for (source_name, used_kw, available_kw) in [
            ("solar", self.solar_used, forecast.solar()),
            ("wind", self.wind_used, forecast.wind()),
        ] {
            if used_kw > available_kw + tolerance_kw {
                return Err(InvariantViolation::OverUsed {
                    source_name,
                    used_kw,
                    available_kw,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "solar_used={:.2} kW  wind_used={:.2} kW | grid_import={:.2} kW  grid_export={:.2} kW",
            self.solar_used, self.wind_used, self.grid_import, self.grid_export,
        )
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
