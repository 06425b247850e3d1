use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sphere_cards::{
    cards::KnownGroupAssets,
    config::Config,
    metadata::{BchdMetadataSource, MetadataResolver},
    resolution::ResolutionCache,
    web::{AppState, WebServer},
};

#[derive(Parser)]
#[command(name = "sphere-cards")]
#[command(version)]
#[command(about = "Serves SLP token cards and redirects NFT1 child tokens to their group card")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening host
    #[arg(short = 'H', long, value_name = "HOST")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Path prefix all routes are mounted under
    #[arg(short = 'b', long, value_name = "PATH")]
    base_path: Option<String>,

    /// BCHD gRPC address used for token metadata
    #[arg(long, value_name = "ADDRESS")]
    bchd_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("sphere_cards={},tower_http=trace", cli.log_level)
    } else {
        format!("sphere_cards={},tower_http=info", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting sphere-cards v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(base_path) = cli.base_path {
        config.web.base_path = base_path;
    }
    if let Some(bchd_url) = cli.bchd_url {
        config.metadata.bchd_url = bchd_url;
    }
    config.validate()?;

    let metadata_source = BchdMetadataSource::connect_lazy(
        &config.metadata.bchd_url,
        config.metadata.request_timeout()?,
    )?;
    let resolution_cache = ResolutionCache::new(MetadataResolver::new(Arc::new(metadata_source)));
    info!("Resolution cache initialized");

    let known_groups = KnownGroupAssets::load(&config.storage.cards_path)
        .await
        .context("failed to enumerate group cards")?;
    info!(
        "Serving cards from {:?} ({} known groups)",
        config.storage.cache_path,
        known_groups.len()
    );

    let state = AppState::new(&config, resolution_cache, known_groups);
    let web_server = WebServer::new(&config, state)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );

    // Create a channel to signal when the server is ready or fails to bind
    let (server_ready_tx, server_ready_rx) = tokio::sync::oneshot::channel();

    let server_handle = tokio::spawn(async move {
        if let Err(e) = web_server.serve_with_signal(server_ready_tx).await {
            tracing::error!("Web server failed: {}", e);
        }
    });

    // Wait for the server bind result (success or failure)
    match server_ready_rx.await {
        Ok(Ok(())) => info!("Web server is now listening"),
        Ok(Err(bind_error)) => {
            tracing::error!("Failed to bind web server: {}", bind_error);
            return Err(bind_error);
        }
        Err(_) => {
            tracing::error!("Web server task completed without signaling");
            return Err(anyhow::anyhow!("Web server failed to start"));
        }
    }

    // Wait for the server to complete (this will block until shutdown)
    server_handle.await?;
    info!("Shut down cleanly");

    Ok(())
}
