//! Microgrid dispatch entry point: CLI wiring, model loading and serving.

use std::path::Path;
use std::process;

use tracing::{error, info};

use microgrid_dispatch::config::{API_KEY_ENV, ServiceConfig};
use microgrid_dispatch::dispatch::allocate;
use microgrid_dispatch::forecast::ModelForecaster;
use microgrid_dispatch::telemetry::init_tracing;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    check_models: bool,
    dispatch: Option<[f64; 3]>,
}

fn print_help() {
    eprintln!("microgrid-dispatch: weather-driven load/renewable forecast and dispatch");
    eprintln!();
    eprintln!("Usage: microgrid-dispatch [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>                   Load service configuration from TOML");
    eprintln!("  --host <addr>                     Override server.host");
    eprintln!("  --port <u16>                      Override server.port");
    eprintln!("  --check-models                    Load and describe the regression models, then exit");
    eprintln!("  --dispatch <load> <solar> <wind>  Allocate the given kW values and exit");
    eprintln!("  --help                            Show this help message");
    eprintln!();
    eprintln!("The weather API key is read from {API_KEY_ENV} when set.");
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn parse_f64(flag: &str, value: Option<&String>) -> f64 {
    let Some(value) = value else {
        fail(&format!("{flag} requires three numeric arguments"));
    };
    value
        .parse::<f64>()
        .unwrap_or_else(|_| fail(&format!("{flag} value \"{value}\" is not a number")))
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        host: None,
        port: None,
        check_models: false,
        dispatch: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    fail("--config requires a path argument");
                };
                cli.config_path = Some(path.clone());
            }
            "--host" => {
                i += 1;
                let Some(host) = args.get(i) else {
                    fail("--host requires an address argument");
                };
                cli.host = Some(host.clone());
            }
            "--port" => {
                i += 1;
                let Some(port) = args.get(i) else {
                    fail("--port requires a u16 argument");
                };
                match port.parse::<u16>() {
                    Ok(p) => cli.port = Some(p),
                    Err(_) => fail(&format!("--port value \"{port}\" is not a valid u16")),
                }
            }
            "--check-models" => {
                cli.check_models = true;
            }
            "--dispatch" => {
                let load = parse_f64("--dispatch", args.get(i + 1));
                let solar = parse_f64("--dispatch", args.get(i + 2));
                let wind = parse_f64("--dispatch", args.get(i + 3));
                cli.dispatch = Some([load, solar, wind]);
                i += 3;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn load_forecaster(cfg: &ServiceConfig) -> ModelForecaster {
    let m = &cfg.models;
    match ModelForecaster::from_paths(&m.load_path, &m.solar_path, &m.wind_path) {
        Ok(fc) => fc.with_wind_scale(m.wind_scale),
        Err(e) => {
            error!(error = %e, "failed to load forecast models");
            eprintln!("error: {e}");
            eprintln!("Please ensure all model files are present (see [models] in the config).");
            process::exit(1);
        }
    }
}

fn main() {
    let cli = parse_args();
    init_tracing();

    // Offline allocation needs neither config nor models
    if let Some([load, solar, wind]) = cli.dispatch {
        match allocate(load, solar, wind) {
            Ok(a) => {
                println!("{}", a.rounded());
                return;
            }
            Err(e) => fail(&e.to_string()),
        }
    }

    let mut config = match cli.config_path.as_deref() {
        Some(path) => ServiceConfig::from_toml_file(Path::new(path))
            .unwrap_or_else(|e| fail(&e.to_string())),
        None => ServiceConfig::default(),
    };
    config.override_api_key(std::env::var(API_KEY_ENV).ok());
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if cli.check_models {
        let forecaster = load_forecaster(&config);
        println!("{}", forecaster.describe());
        return;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let forecaster = load_forecaster(&config);
    info!("forecast models loaded");

    serve(config, forecaster);
}

#[cfg(feature = "api")]
fn serve(config: ServiceConfig, forecaster: ModelForecaster) {
    use std::sync::Arc;

    use microgrid_dispatch::api::{self, AppState};
    use microgrid_dispatch::service::PredictionService;
    use microgrid_dispatch::weather::WeatherApiClient;

    let weather = WeatherApiClient::new(&config.weather).unwrap_or_else(|e| fail(&e.to_string()));
    let state = Arc::new(AppState {
        predictions: PredictionService::new(Arc::new(weather), Arc::new(forecaster)),
    });

    let rt = tokio::runtime::Runtime::new()
        .unwrap_or_else(|e| fail(&format!("failed to create tokio runtime: {e}")));
    let addr = config.server.bind_addr();
    if let Err(e) = rt.block_on(api::serve(state, &addr)) {
        error!(error = %e, addr = %addr, "server stopped");
        fail(&format!("server error on {addr}: {e}"));
    }
}

#[cfg(not(feature = "api"))]
fn serve(_config: ServiceConfig, _forecaster: ModelForecaster) {
    fail("built without the `api` feature; only --dispatch and --check-models are available");
}
