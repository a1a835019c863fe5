//! WeatherAPI client behavior against a mock HTTP server.

#![cfg(feature = "api")]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use microgrid_dispatch::weather::{WeatherApiClient, WeatherError, WeatherSource};

const ENDPOINT: &str = "/v1/current.json";

async fn client_for(server: &MockServer) -> WeatherApiClient {
    WeatherApiClient::with_timeout(
        &format!("{}{ENDPOINT}", server.uri()),
        "test-key",
        Duration::from_secs(5),
    )
    .unwrap()
}

async fn respond_with(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn parses_current_conditions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("key", "test-key"))
        .and(query_param("q", "Mombasa"))
        .and(query_param("aqi", "no"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": { "name": "Mombasa", "country": "Kenya" },
            "current": {
                "temp_c": 29.5,
                "wind_kph": 18.4,
                "humidity": 74,
                "pressure_mb": 1011.0,
                "uv": 7.0,
                "cloud": 25
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = client_for(&server).await.fetch("Mombasa").await.unwrap();

    assert_eq!(report.city, "Mombasa");
    let f = report.features;
    assert_eq!(f.temperature, 29.5);
    assert_eq!(f.wind_speed, 18.4);
    assert_eq!(f.humidity, 74.0);
    assert_eq!(f.atmospheric_pressure, 1011.0);
    assert_eq!(f.solar_irradiance, 700.0);
    assert!(f.hour_of_day < 24);
    assert!(f.day_of_week < 7);
}

#[tokio::test]
async fn missing_fields_read_as_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": { "temp_c": 12.0 }
        })))
        .mount(&server)
        .await;

    let report = client_for(&server).await.fetch("Oslo").await.unwrap();
    assert_eq!(report.features.temperature, 12.0);
    assert_eq!(report.features.wind_speed, 0.0);
    assert_eq!(report.features.solar_irradiance, 0.0);
}

#[tokio::test]
async fn status_400_is_invalid_city() {
    let server = respond_with(400).await;
    let err = client_for(&server).await.fetch("Atlantis").await.unwrap_err();
    assert!(matches!(err, WeatherError::InvalidCity(ref c) if c == "Atlantis"));
}

#[tokio::test]
async fn status_401_is_unauthorized() {
    let server = respond_with(401).await;
    let err = client_for(&server).await.fetch("Lima").await.unwrap_err();
    assert!(matches!(err, WeatherError::Unauthorized));
}

#[tokio::test]
async fn status_403_is_forbidden() {
    let server = respond_with(403).await;
    let err = client_for(&server).await.fetch("Lima").await.unwrap_err();
    assert!(matches!(err, WeatherError::Forbidden));
}

#[tokio::test]
async fn other_status_is_reported_with_code() {
    let server = respond_with(503).await;
    let err = client_for(&server).await.fetch("Lima").await.unwrap_err();
    assert!(matches!(err, WeatherError::Status(503)));
    assert_eq!(err.to_string(), "WeatherAPI error: 503");
}

#[tokio::test]
async fn malformed_body_is_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.fetch("Lima").await.unwrap_err();
    assert!(matches!(err, WeatherError::Format(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "current": {} }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = WeatherApiClient::with_timeout(
        &format!("{}{ENDPOINT}", server.uri()),
        "test-key",
        Duration::from_millis(200),
    )
    .unwrap();
    let err = client.fetch("Lima").await.unwrap_err();
    assert!(matches!(err, WeatherError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_is_connect_error() {
    let client = WeatherApiClient::with_timeout(
        "http://127.0.0.1:1/v1/current.json",
        "test-key",
        Duration::from_secs(2),
    )
    .unwrap();
    let err = client.fetch("Lima").await.unwrap_err();
    assert!(matches!(err, WeatherError::Connect), "got {err:?}");
    assert_eq!(
        err.to_string(),
        "Failed to connect to WeatherAPI. Please check your internet connection."
    );
}
