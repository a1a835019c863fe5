//! Weather feature vector consumed by the regression models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One named model input.
///
/// The string form is the key used in model files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Temperature,
    WindSpeed,
    Humidity,
    AtmosphericPressure,
    SolarIrradiance,
    HourOfDay,
    DayOfWeek,
}

impl Feature {
    /// Every feature, in canonical column order.
    pub const ALL: [Feature; 7] = [
        Feature::Temperature,
        Feature::WindSpeed,
        Feature::Humidity,
        Feature::AtmosphericPressure,
        Feature::SolarIrradiance,
        Feature::HourOfDay,
        Feature::DayOfWeek,
    ];

    /// Canonical feature name.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Temperature => "temperature",
            Feature::WindSpeed => "wind_speed",
            Feature::Humidity => "humidity",
            Feature::AtmosphericPressure => "atmospheric_pressure",
            Feature::SolarIrradiance => "solar_irradiance",
            Feature::HourOfDay => "hour_of_day",
            Feature::DayOfWeek => "day_of_week",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Feature::ALL.iter().map(|f| f.name()).collect();
                format!("unknown feature \"{s}\", expected one of: {}", known.join(", "))
            })
    }
}

/// Current weather plus calendar context at the time of the request.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherFeatures {
    /// Air temperature (°C).
    pub temperature: f64,
    /// Wind speed (kph).
    pub wind_speed: f64,
    /// Relative humidity (%).
    pub humidity: f64,
    /// Atmospheric pressure (mb).
    pub atmospheric_pressure: f64,
    /// Solar irradiance estimate (W/m²).
    pub solar_irradiance: f64,
    /// Local hour, 0–23.
    pub hour_of_day: u32,
    /// Local weekday, 0 = Monday … 6 = Sunday.
    pub day_of_week: u32,
}

impl WeatherFeatures {
    /// Returns the numeric value of `feature`.
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Temperature => self.temperature,
            Feature::WindSpeed => self.wind_speed,
            Feature::Humidity => self.humidity,
            Feature::AtmosphericPressure => self.atmospheric_pressure,
            Feature::SolarIrradiance => self.solar_irradiance,
            Feature::HourOfDay => f64::from(self.hour_of_day),
            Feature::DayOfWeek => f64::from(self.day_of_week),
        }
    }
}
