//! Media Harvester main entry point
//!
//! This is the command-line interface for the Media Harvester server.

use clap::Parser;
use media_harvester::api::{AppState, HttpServer};
use media_harvester::config::{load_config_or_default, validate, Config};
use media_harvester::ingest::IngestPipeline;
use media_harvester::storage::{open_storage, MediaStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

/// Media Harvester: a batching web media scraper
///
/// Accepts page URLs over HTTP, fetches them in the background, and stores
/// every image and video reference found for paginated retrieval.
#[derive(Parser, Debug)]
#[command(name = "media-harvester")]
#[command(version)]
#[command(about = "A batching web media scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Listening port (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Database location (overrides config and DATABASE_URL)
    #[arg(long, value_name = "URL")]
    database: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show statistics from the database and exit
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = match load_cli_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e.into());
        }
    };

    if cli.stats {
        handle_stats(&config)?;
        Ok(())
    } else {
        handle_serve(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("media_harvester=info,warn"),
            1 => EnvFilter::new("media_harvester=debug,tower_http=debug,info"),
            2 => EnvFilter::new("media_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads configuration, then applies command-line overrides
fn load_cli_config(cli: &Cli) -> media_harvester::Result<Config> {
    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using defaults"),
    }

    let mut config = load_config_or_default(cli.config.as_deref())?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(database) = &cli.database {
        config.database.url = database.clone();
    }
    validate(&config)?;

    Ok(config)
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> media_harvester::Result<()> {
    use media_harvester::output::{load_statistics, print_statistics};

    println!("Database: {}\n", config.database.url);

    let storage = open_storage(&config.database)?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Opens storage and builds the ingestion pipeline around it
fn build_state(config: &Config) -> media_harvester::Result<AppState> {
    tracing::info!("Opening database: {}", config.database.url);
    let store: Arc<dyn MediaStore> = Arc::new(open_storage(&config.database)?);

    let pipeline = IngestPipeline::new(&config.worker, &config.user_agent, Arc::clone(&store))?;

    Ok(AppState { pipeline, store })
}

/// Handles the main server operation
async fn handle_serve(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config)?;
    let pipeline = Arc::clone(&state.pipeline);
    tracing::info!(
        "Worker batch size {}, fetch timeout {}ms",
        config.worker.batch_size,
        config.worker.fetch_timeout_ms
    );

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl-C, shutting down");
        }
        let _ = shutdown_tx.send(());
    });

    let result = HttpServer::new(config.server, state).run(shutdown_rx).await;

    // The queue is in-memory only
    let dropped = pipeline.queue_len();
    if dropped > 0 {
        tracing::warn!("Dropping {} queued URLs on shutdown", dropped);
    }

    result
}
