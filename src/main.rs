//! spot-stats entry point: CLI wiring, series loading and report output.

use std::path::Path;
use std::process;

use spot_stats::config::AppConfig;
use spot_stats::io::export::export_csv;
use spot_stats::io::import::load_csv;
use spot_stats::report::PriceReport;
use spot_stats::series::PriceSeries;
use spot_stats::synthetic::SyntheticPrices;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "spot_stats=info";

/// Where the price series comes from.
enum Source {
    Demo,
    Csv(String),
    #[cfg(feature = "fetch")]
    Fetch,
}

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    source: Source,
    seed_override: Option<u64>,
    durations: Vec<f64>,
    export: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("spot-stats: electricity spot-price statistics");
    eprintln!();
    eprintln!("Usage: spot-stats [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load settings from TOML config file");
    eprintln!("  --csv <path>             Load prices from CSV (day,hour,price)");
    #[cfg(feature = "fetch")]
    eprintln!("  --fetch                  Fetch today's and tomorrow's prices from the provider");
    eprintln!("  --demo                   Use a synthetic price series (default)");
    eprintln!("  --seed <u64>             Override synthetic series seed");
    eprintln!("  --duration <hours>       Add a window length to the report (repeatable)");
    eprintln!("  --export <path>          Export the loaded series to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the report");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Log verbosity follows RUST_LOG (default: {DEFAULT_LOG_FILTER}).");
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str, what: &str) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        source: Source::Demo,
        seed_override: None,
        durations: Vec::new(),
        export: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                let path = next_value(&args, &mut i, "--config", "a path argument");
                cli.config_path = Some(path.to_string());
            }
            "--csv" => {
                let path = next_value(&args, &mut i, "--csv", "a path argument");
                cli.source = Source::Csv(path.to_string());
            }
            #[cfg(feature = "fetch")]
            "--fetch" => {
                cli.source = Source::Fetch;
            }
            "--demo" => {
                cli.source = Source::Demo;
            }
            "--seed" => {
                let value = next_value(&args, &mut i, "--seed", "a u64 argument");
                if let Ok(s) = value.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{value}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--duration" => {
                let value = next_value(&args, &mut i, "--duration", "an hours argument");
                if let Ok(d) = value.parse::<f64>() {
                    cli.durations.push(d);
                } else {
                    eprintln!("error: --duration value \"{value}\" is not a number");
                    process::exit(1);
                }
            }
            "--export" => {
                let path = next_value(&args, &mut i, "--export", "a path argument");
                cli.export = Some(path.to_string());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                let value = next_value(&args, &mut i, "--port", "a u16 argument");
                if let Ok(p) = value.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{value}\" is not a valid u16");
                    process::exit(1);
                }
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

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Obtains the series from the selected source.
fn load_series(source: &Source, config: &AppConfig) -> Result<PriceSeries, String> {
    match source {
        Source::Demo => {
            info!(seed = config.synthetic.seed, "using synthetic price series");
            Ok(SyntheticPrices::new(config.synthetic.seed).series(true))
        }
        Source::Csv(path) => {
            load_csv(Path::new(path)).map_err(|e| format!("failed to load \"{path}\": {e}"))
        }
        #[cfg(feature = "fetch")]
        Source::Fetch => {
            use spot_stats::provider::client::PriceClient;

            PriceClient::new(&config.fetch)
                .and_then(|client| client.fetch())
                .map_err(|e| e.to_string())
        }
    }
}

fn main() {
    let cli = parse_args();
    init_logging();

    let mut config = if let Some(ref path) = cli.config_path {
        match AppConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        AppConfig::default()
    };

    if let Some(seed) = cli.seed_override {
        config.synthetic.seed = seed;
    }
    config.report.durations_hours.extend(&cli.durations);

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let series = match load_series(&cli.source, &config) {
        Ok(series) => series,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let granularity = config.granularity();
    let report = PriceReport::from_series(&series, &config.report.durations_hours, granularity);
    println!("{report}");

    if let Some(ref path) = cli.export {
        if let Err(e) = export_csv(&series, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        info!(%path, "series written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(spot_stats::api::AppState::new(
            series,
            &config.report.durations_hours,
            granularity,
        ));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(spot_stats::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
