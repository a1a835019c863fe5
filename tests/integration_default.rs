//! Integration tests for the shipped models and sample configuration.

use std::path::{Path, PathBuf};

use microgrid_dispatch::config::ServiceConfig;
use microgrid_dispatch::forecast::{
    DEFAULT_WIND_SCALE, ForecastProvider, ModelForecaster, WeatherFeatures,
};

fn repo_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(rel)
}

fn shipped_forecaster() -> ModelForecaster {
    ModelForecaster::from_paths(
        &repo_path("models/grid_load.toml"),
        &repo_path("models/solar.toml"),
        &repo_path("models/wind.toml"),
    )
    .expect("shipped models should load")
}

fn noon_weather() -> WeatherFeatures {
    WeatherFeatures {
        temperature: 30.0,
        wind_speed: 20.0,
        humidity: 50.0,
        atmospheric_pressure: 1010.0,
        solar_irradiance: 600.0,
        hour_of_day: 12,
        day_of_week: 2,
    }
}

#[test]
fn sample_config_parses_and_points_at_shipped_models() {
    let cfg = ServiceConfig::from_toml_file(&repo_path("config/microgrid.toml"))
        .expect("sample config should parse");

    assert_eq!(cfg.server.port, 5000);
    assert_eq!(cfg.models.wind_scale, DEFAULT_WIND_SCALE);
    for p in [&cfg.models.load_path, &cfg.models.solar_path, &cfg.models.wind_path] {
        assert!(repo_path(&p.to_string_lossy()).is_file(), "{}", p.display());
    }
}

#[test]
fn sample_config_only_lacks_the_api_key() {
    let mut cfg = ServiceConfig::from_toml_file(&repo_path("config/microgrid.toml")).unwrap();
    let errors = cfg.validate();
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].field, "weather.api_key");

    cfg.override_api_key(Some("k".to_string()));
    assert!(cfg.validate().is_empty());
}

#[test]
fn shipped_models_produce_a_plausible_forecast() {
    let forecast = shipped_forecaster().forecast(&noon_weather()).unwrap();

    assert!(forecast.load() > 0.0);
    assert!(forecast.solar() > 0.0);
    // -3 + 1.15*20 + 0.001*1010 - 0.02*30 = 20.41 before scaling
    assert!((forecast.wind() - 20.41 * DEFAULT_WIND_SCALE).abs() < 1e-9);
}

#[test]
fn shipped_forecast_allocates_cleanly() {
    let forecast = shipped_forecaster().forecast(&noon_weather()).unwrap();
    let a = forecast.allocate();
    assert!(a.check(&forecast, forecast.tolerance_kw()).is_ok());
}

#[test]
fn calm_night_forecasts_floor_at_zero() {
    let night = WeatherFeatures {
        wind_speed: 0.0,
        solar_irradiance: 0.0,
        hour_of_day: 2,
        ..noon_weather()
    };
    let forecast = shipped_forecaster().forecast(&night).unwrap();
    assert_eq!(forecast.wind(), 0.0);
    assert_eq!(forecast.solar(), 0.0);
}
