//! Request handlers for the API endpoints.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};

use super::AppState;
use super::error::{ApiError, MAX_CITY_LEN};
use super::types::{HealthResponse, PredictQuery, PredictResponse};

/// Service banner.
///
/// `GET /` → 200 + `HealthResponse` JSON
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online",
        service: "Microgrid Dispatch Backend",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: BTreeMap::from([(
            "/predict",
            "GET - Forecast load, solar and wind for a city and allocate generation",
        )]),
    })
}

/// Weather, forecast and dispatch allocation for one city.
///
/// `GET /predict?city=<name>` → 200 + `PredictResponse` JSON
/// missing, blank or over-long `city` → 400 + `ErrorResponse`
/// any pipeline failure → 500 + `ErrorResponse`
/// a repeated `city` keeps its first value
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PredictResponse>, ApiError> {
    let query = PredictQuery::from_pairs(pairs);
    let city = validate_city(query.city.as_deref())?;
    let prediction = state.predictions.predict(city).await?;
    Ok(Json(PredictResponse::from(&prediction)))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Fallback for known routes hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Converts a handler panic into the generic 500 body.
pub fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::Internal.into_response()
}

/// Trims `raw` and checks it is a usable city name.
pub fn validate_city(raw: Option<&str>) -> Result<&str, ApiError> {
    let city = raw.map(str::trim).unwrap_or_default();
    if city.is_empty() {
        return Err(ApiError::MissingCity);
    }
    if city.chars().count() > MAX_CITY_LEN {
        return Err(ApiError::CityTooLong);
    }
    Ok(city)
}
