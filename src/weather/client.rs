//! WeatherAPI.com `current.json` client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{CurrentConditions, WeatherError, WeatherReport, WeatherSource};
use crate::config::WeatherConfig;

#[derive(Debug, Default, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    current: CurrentConditions,
}

/// HTTP client for the WeatherAPI current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl WeatherApiClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Request`] if the HTTP client cannot be built.
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::with_timeout(&config.api_url, &config.api_key, config.timeout())
    }

    /// Creates a client with an explicit endpoint, key and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Request`] if the HTTP client cannot be built.
    pub fn with_timeout(
        api_url: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Request(e.to_string()))?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

fn transport_error(err: reqwest::Error) -> WeatherError {
    if err.is_timeout() {
        WeatherError::Timeout
    } else if err.is_connect() {
        WeatherError::Connect
    } else {
        WeatherError::Request(err.to_string())
    }
}

#[async_trait]
impl WeatherSource for WeatherApiClient {
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        debug!(city, url = %self.api_url, "requesting current weather");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("aqi", "no")])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(city, status = status.as_u16(), "weather API returned an error status");
            return Err(WeatherError::from_status(status.as_u16(), city));
        }

        let body: CurrentResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                WeatherError::Timeout
            } else {
                WeatherError::Format(e.to_string())
            }
        })?;

        let now = Local::now();
        Ok(WeatherReport {
            city: city.to_string(),
            timestamp: now,
            features: body.current.features_at(&now),
        })
    }
}
