//! API error type and its JSON rendering.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::types::ErrorResponse;
use crate::service::ServiceError;

/// Longest accepted city name, in characters.
pub const MAX_CITY_LEN: usize = 100;

/// Errors returned from API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("City parameter is required. Usage: /predict?city=<city_name>")]
    MissingCity,
    #[error("City name is too long (max {MAX_CITY_LEN} characters)")]
    CityTooLong,
    #[error(transparent)]
    Prediction(#[from] ServiceError),
    #[error("The requested endpoint does not exist")]
    NotFound,
    #[error("The method is not allowed for the requested URL")]
    MethodNotAllowed,
    #[error("An unexpected error occurred")]
    Internal,
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCity | ApiError::CityTooLong => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Prediction(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error category string placed in the `error` field.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::MissingCity => "Missing required parameter",
            ApiError::CityTooLong => "Invalid parameter value",
            ApiError::Prediction(_) => "Prediction Error",
            ApiError::NotFound => "Not Found",
            ApiError::MethodNotAllowed => "Method Not Allowed",
            ApiError::Internal => "Internal Server Error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Prediction(err) => tracing::error!(error = %err, "prediction failed"),
            ApiError::Internal => tracing::error!("unhandled failure while serving request"),
            _ => tracing::debug!(error = %self, "client error"),
        }

        let body = ErrorResponse {
            error: self.error_type().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
