//! CLI entry point for the trip forecast service.
//!
//! Provides subcommands for serving the forecast API over HTTP, computing a
//! single forecast from the command line, and listing known zip codes.

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trip_forecast::config::EngineConfig;
use trip_forecast::forecast::Granularity;
use trip_forecast::infra::{RemoteAuth, local_store, remote_store};
use trip_forecast::output::{append_records, to_json};
use trip_forecast::server;
use trip_forecast::services::{Forecaster, ObservationStore};

#[derive(Parser)]
#[command(name = "trip_forecast")]
#[command(about = "Forecast trip counts per zip code", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where observations are read from.
#[derive(Args)]
struct SourceArgs {
    /// CSV file or directory of CSV / CSV.GZ files
    #[arg(long, env = "OBSERVATIONS_PATH", conflicts_with = "remote")]
    data: Option<PathBuf>,

    /// Base URL of a remote observation store
    #[arg(long, env = "OBSERVATIONS_URL")]
    remote: Option<String>,

    /// API key for the remote store
    #[arg(long, env = "OBSERVATIONS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Send the API key as this query parameter instead of a bearer header
    #[arg(long, env = "OBSERVATIONS_API_KEY_PARAM", requires = "api_key")]
    api_key_param: Option<String>,

    /// Remote store request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Engine tuning JSON file
    #[arg(long, env = "FORECAST_CONFIG")]
    config: Option<String>,
}

impl SourceArgs {
    fn open(&self) -> Result<Arc<dyn ObservationStore>> {
        match (&self.data, &self.remote) {
            (_, Some(url)) => {
                let auth = match (&self.api_key, &self.api_key_param) {
                    (Some(key), Some(param)) => RemoteAuth::UrlParam {
                        param_name: param.clone(),
                        key: key.clone(),
                    },
                    (Some(key), None) => RemoteAuth::Bearer(key.clone()),
                    (None, _) => RemoteAuth::None,
                };
                info!(url = %url, "Using remote observation store");
                remote_store(url, auth, Duration::from_secs(self.timeout))
            }
            (Some(path), None) => local_store(path),
            (None, None) => bail!("no observation source: pass --data or --remote"),
        }
    }

    fn forecaster(&self) -> Result<Forecaster> {
        let config = EngineConfig::load_or_default(self.config.as_deref())?;
        Ok(Forecaster::new(self.open()?, config))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the forecast API over HTTP
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Address to bind
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to bind
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Forecast a single zip code and print JSON (or append CSV rows)
    Forecast {
        /// Zip code to forecast
        #[arg(value_name = "ZIP")]
        zip: String,

        /// Period granularity: d, w or m
        #[arg(short, long, default_value = "d")]
        period: String,

        /// Number of future periods (defaults per granularity)
        #[arg(long)]
        horizon: Option<String>,

        /// CSV file to append results to instead of printing JSON
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// List zip codes known to the observation store
    ZipCodes {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/trip_forecast.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("trip_forecast.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { source, host, port } => {
            let addr: SocketAddr = format!("{host}:{port}").parse()?;
            server::serve(addr, source.forecaster()?).await?;
        }
        Commands::Forecast {
            zip,
            period,
            horizon,
            output,
            source,
        } => {
            let granularity: Granularity = period.parse()?;
            let forecaster = source.forecaster()?;
            let horizon = forecaster
                .config()
                .settings(granularity)
                .horizon(horizon.as_deref())?;

            let result = forecaster.forecast(&zip, granularity, horizon).await?;

            match output {
                Some(path) => {
                    append_records(&path, &result)?;
                    info!(path = %path, points = result.points().count(), "Forecast appended");
                }
                None => println!("{}", to_json(&result)?),
            }
        }
        Commands::ZipCodes { source } => {
            let zips = source.forecaster()?.zip_codes().await?;

            info!(total = zips.len(), "Zip code list fetched");
            for zip in &zips {
                println!("{zip}");
            }
        }
    }

    Ok(())
}
