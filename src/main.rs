//! Weather Triples - Historical weather observations stored as RDF triples, served as JSON.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use weather_triples::api::WeatherServer;
use weather_triples::config::{ConfigLoader, WeatherConfig};
use weather_triples::ingest::TurtleLoader;
use weather_triples::store::FactStore;
use weather_triples::weather::ObservationQueryEngine;

#[derive(Parser)]
#[command(
    name = "weather-triples",
    about = "Query historical weather observations stored as RDF triples",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the fact store database (overrides config).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the weather API over HTTP.
    Serve {
        /// Turtle file to load before serving.
        #[arg(long)]
        data: Option<PathBuf>,
        /// Host address to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Load a Turtle file into the fact store and exit.
    Ingest {
        /// The Turtle document to load.
        file: PathBuf,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loader = cli
        .config
        .clone()
        .map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let mut config = match loader.load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(store) = cli.store {
        config.store.path = store;
    }

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, mut config: WeatherConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = FactStore::open(&config.store.path, config.store.read_connections).await?;

    match command {
        Commands::Ingest { file } => {
            let report = TurtleLoader::new(store).load_file(&file).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Serve { data, host, port } => {
            if let Some(data) = data {
                TurtleLoader::new(store.clone()).load_file(&data).await?;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let engine = ObservationQueryEngine::new(store, Arc::new(config.station_directory()))
                .with_options(config.query_options());
            let server = WeatherServer::new(engine).with_config(config.server.clone());

            let cancel = server.cancel_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Received Ctrl-C");
                    cancel.cancel();
                }
            });

            server.run().await?;
        }
    }

    Ok(())
}
