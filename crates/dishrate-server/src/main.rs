//! DishRate Server
//!
//! HTTP service that classifies free-text food reviews into 1-5 star
//! ratings with a pretrained model, persists them, and serves
//! aggregate analytics and customer insights.

use anyhow::Result;
use axum::http::HeaderValue;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use dishrate_server::config::CorsConfig;
use dishrate_server::{create_router, AppState, Cli, ReviewStore, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    info!("Starting DishRate server");

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!("Classifier: {:?}", config.classifier.kind);

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // Load the classifier once; the service must not come up without it
    info!("Loading rating classifier...");
    let classifier = dishrate_classifier::load_classifier(&config.classifier)?;
    info!("Classifier '{}' ready", classifier.name());

    // Open the review store, replaying any journal
    let store = Arc::new(ReviewStore::open(&config.store)?);
    info!("Review store open with {} reviews", store.len());

    let state = AppState::new(classifier, store, Some(metrics_handle));
    let app = create_router(state).layer(cors_layer(&config.cors));

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    // Graceful shutdown handler
    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// CORS defaults to the configured frontend origins; wide-open CORS is
/// an explicit opt-in.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allow_any_origin {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("dishrate_server=debug,dishrate_classifier=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("dishrate_server=info,dishrate_classifier=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "dishrate_requests_total",
        "Total number of API requests processed"
    );
    metrics::describe_counter!(
        "dishrate_predictions_total",
        "Total number of reviews classified and stored"
    );
    metrics::describe_counter!(
        "dishrate_reviews_cleared_total",
        "Total number of reviews removed by clear-all"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
