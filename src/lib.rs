//! Microgrid forecast and renewable dispatch service.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
/// Renewable-first allocation of forecast generation against load.
pub mod dispatch;
pub mod forecast;
#[cfg(feature = "api")]
pub mod service;
pub mod telemetry;
#[cfg(feature = "api")]
pub mod weather;
