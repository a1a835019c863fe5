//! REST API for city forecasts and dispatch allocation.
//!
//! Provides two GET endpoints:
//! - `/`: service banner
//! - `/predict?city=<name>`: weather, forecast and allocation
//!
//! Unknown routes answer 404, and known routes hit with another method answer
//! 405, with the same `{error, message}` body used for every other failure.

mod error;
mod handlers;
mod types;

use std::io;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::service::PredictionService;
use crate::telemetry::shutdown_signal;

pub use error::{ApiError, MAX_CITY_LEN};
pub use handlers::validate_city;
pub use types::{DEFAULT_CLOUD_COVER, ErrorResponse, PredictResponse, WeatherSummary};

/// Application state shared across all request handlers.
///
/// Built once at startup and wrapped in `Arc`; nothing in it is mutated
/// after construction.
pub struct AppState {
    /// Weather → forecast → dispatch pipeline.
    pub predictions: PredictionService,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/predict", get(handlers::predict))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Binds to `addr` and serves the API until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: &str) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
