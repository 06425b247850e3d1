//! Web layer module
//!
//! HTTP interface for the card service. Handlers are thin: card bytes come
//! from [`CardStore`], group resolution from [`ResolutionCache`].
//!
//! # Routes
//!
//! All routes are mounted under the configured base path.
//! - `GET /cards/{size}/{token_id}`: the stored card, or 404
//! - `GET /{size}/{token_id}`: 301 to the group's card, or 404
//! - `GET /health`: liveness and cache statistics

use anyhow::Result;
use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::{
    cards::{CardStore, KnownGroupAssets},
    config::Config,
    resolution::ResolutionCache,
};

pub mod handlers;
pub mod responses;

pub use responses::HealthResponse;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Normalized base path, empty when mounted at the root
    pub base_path: String,
    pub resolution_cache: ResolutionCache,
    pub known_groups: Arc<KnownGroupAssets>,
    pub card_store: CardStore,
    /// Application start time for uptime calculation
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        config: &Config,
        resolution_cache: ResolutionCache,
        known_groups: KnownGroupAssets,
    ) -> Self {
        Self {
            base_path: config.web.normalized_base_path(),
            resolution_cache,
            known_groups: Arc::new(known_groups),
            card_store: CardStore::new(config.storage.cache_path.clone()),
            start_time: Utc::now(),
        }
    }
}

/// Build the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/cards/{size}/{token_id}", get(handlers::serve_card))
        .route("/{size}/{token_id}", get(handlers::redirect_to_group_card));

    // axum refuses to nest at "/"
    let app = if state.base_path.is_empty() {
        routes
    } else {
        Router::new().nest(&state.base_path, routes)
    };

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    host: String,
    port: u16,
    shutdown_timeout: Duration,
}

impl WebServer {
    pub fn new(config: &Config, state: AppState) -> Result<Self> {
        Ok(Self {
            app: create_router(state),
            host: config.web.host.clone(),
            port: config.web.port,
            shutdown_timeout: config.web.shutdown_timeout()?,
        })
    }

    /// Get the host address
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM, reporting the bind result on `ready_signal`.
    ///
    /// After a shutdown signal, in-flight requests get `shutdown_timeout` to
    /// finish before the process exits with status 1.
    pub async fn serve_with_signal(
        self,
        ready_signal: tokio::sync::oneshot::Sender<Result<()>>,
    ) -> Result<()> {
        let listener = match tokio::net::TcpListener::bind((self.host.as_str(), self.port)).await {
            Ok(listener) => listener,
            Err(bind_error) => {
                let bind_err_msg =
                    format!("Failed to bind to {}:{}: {}", self.host, self.port, bind_error);
                let _ = ready_signal.send(Err(anyhow::anyhow!("{}", bind_err_msg)));
                return Err(anyhow::anyhow!("{}", bind_err_msg));
            }
        };
        let _ = ready_signal.send(Ok(()));
        info!("Card server listening on {}:{}", self.host, self.port);

        let shutdown_timeout = self.shutdown_timeout;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                wait_for_shutdown_signal().await;
                tokio::spawn(async move {
                    tokio::time::sleep(shutdown_timeout).await;
                    error!("Could not close connections in time, forcefully shutting down");
                    std::process::exit(1);
                });
            })
            .await?;

        info!("Closed out remaining connections");
        Ok(())
    }
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
