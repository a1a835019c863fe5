//! Shared test fixtures for API integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::{Local, TimeZone};
use serde_json::Value;
use tower::util::ServiceExt;

use microgrid_dispatch::api::{AppState, router};
use microgrid_dispatch::dispatch::Forecast;
use microgrid_dispatch::forecast::{ForecastError, ForecastProvider, WeatherFeatures};
use microgrid_dispatch::service::PredictionService;
use microgrid_dispatch::weather::{WeatherError, WeatherReport, WeatherSource};

/// Weather source returning fixed conditions, or failing with a status code.
pub struct StubWeather {
    pub features: WeatherFeatures,
    pub fail_status: Option<u16>,
}

#[async_trait]
impl WeatherSource for StubWeather {
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        if let Some(status) = self.fail_status {
            return Err(WeatherError::from_status(status, city));
        }
        Ok(WeatherReport {
            city: city.to_string(),
            timestamp: Local
                .with_ymd_and_hms(2024, 6, 3, 12, 0, 0)
                .single()
                .unwrap_or_else(Local::now),
            features: self.features,
        })
    }
}

/// Forecaster returning a fixed `(load, solar, wind)` triple.
pub struct FixedForecast(pub f64, pub f64, pub f64);

impl ForecastProvider for FixedForecast {
    fn forecast(&self, _features: &WeatherFeatures) -> Result<Forecast, ForecastError> {
        Ok(Forecast::new(self.0, self.1, self.2)?)
    }
}

/// Default weather used by the stubs.
pub fn sample_weather() -> WeatherFeatures {
    WeatherFeatures {
        temperature: 28.4,
        wind_speed: 16.2,
        humidity: 54.0,
        atmospheric_pressure: 1009.0,
        solar_irradiance: 600.0,
        hour_of_day: 12,
        day_of_week: 0,
    }
}

/// Router backed by fixed weather and a fixed forecast.
pub fn router_with_forecast(load: f64, solar: f64, wind: f64) -> Router {
    let weather = StubWeather {
        features: sample_weather(),
        fail_status: None,
    };
    let service = PredictionService::new(
        Arc::new(weather),
        Arc::new(FixedForecast(load, solar, wind)),
    );
    router(Arc::new(AppState {
        predictions: service,
    }))
}

/// Router whose weather lookup fails with `status`.
pub fn router_with_weather_failure(status: u16) -> Router {
    let weather = StubWeather {
        features: sample_weather(),
        fail_status: Some(status),
    };
    let service = PredictionService::new(Arc::new(weather), Arc::new(FixedForecast(1.0, 1.0, 1.0)));
    router(Arc::new(AppState {
        predictions: service,
    }))
}

/// Router with no forecast provider installed, optionally failing weather.
pub fn router_uninitialized(fail_status: Option<u16>) -> Router {
    let weather = StubWeather {
        features: sample_weather(),
        fail_status,
    };
    router(Arc::new(AppState {
        predictions: PredictionService::uninitialized(Arc::new(weather)),
    }))
}

/// Sends `GET uri` and returns the status and parsed JSON body.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    send_json(app, Method::GET, uri).await
}

/// Sends `method uri` and returns the status and parsed JSON body.
pub async fn send_json(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}
