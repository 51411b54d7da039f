//! Gazetteer server binary
//!
//! Loads configuration, initializes tracing, seeds the starter dataset
//! when the store is empty and serves the REST API.

mod seed;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use gazetteer_config::{ConfigLoader, GazetteerConfig, LoggingConfig};
use gazetteer_rest_api::{create_rest_app, AppConfig};
use gazetteer_storage::GeoStore;
use gazetteer_web::middleware::CorsConfig;

#[derive(Parser)]
#[command(name = "gazetteer", version, about = "Geographic reference data service")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Validate the configuration and print the effective values
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new()
        .load(cli.config.as_deref())
        .context("failed to load configuration")?;

    init_tracing(&config.logging);

    match cli.command {
        Command::Config => {
            let rendered =
                serde_yaml::to_string(&config).context("failed to render configuration")?;
            println!("{}", rendered);
            Ok(())
        }
        Command::Serve { port } => serve(config, port).await,
    }
}

fn init_tracing(logging: &LoggingConfig) {
    use gazetteer_config::domains::logging::LogFormat;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn serve(mut config: GazetteerConfig, port_override: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port_override {
        config.server.port = port;
    }

    let store = GeoStore::new();
    if config.storage.seed_on_start && store.is_empty() {
        seed::load_starter_data(&store)
            .await
            .context("failed to seed starter data")?;
    }

    let app_config = AppConfig {
        cors: CorsConfig {
            allowed_origins: config.server.cors.allowed_origins.clone(),
            allow_credentials: config.server.cors.allow_credentials,
            ..Default::default()
        },
        ..Default::default()
    };
    let app = create_rest_app(store, app_config);

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    tracing::info!("listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install the shutdown signal handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
