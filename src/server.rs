use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    clock::SystemClock,
    config::Config,
    handlers::{self, AppState},
    metrics::{self, ErrorCounter},
    service::Services,
    signals::setup_signal_handlers,
    store::SqliteLogStore,
};

/// Maximum accepted request body
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Start the LogflareX server
///
/// This function:
/// 1. Initializes metrics and the error counter
/// 2. Opens the log store (running migrations)
/// 3. Builds the services and the Axum application
/// 4. Serves requests until SIGINT/SIGTERM, then closes the store
pub async fn start_server(config: Config) -> Result<()> {
    info!("Initializing Prometheus metrics...");
    let metrics_handle = Arc::new(metrics::init_metrics()?);
    let error_counter = Arc::new(ErrorCounter::new());

    let store = Arc::new(
        SqliteLogStore::connect(&config.database)
            .await
            .context("Failed to open log store")?,
    );

    let services = Services::new(store.clone(), Arc::new(SystemClock), error_counter, &config);
    let app = create_router(
        AppState {
            services,
            metrics: metrics_handle,
        },
        &config,
    );

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let (shutdown_tx, signal_handle) = setup_signal_handlers();
    let mut shutdown_rx = shutdown_tx.subscribe();

    info!("Starting LogflareX on {}", addr);
    info!(
        "Configuration: default limit {}, max limit {}, alert window {}m, threshold {}",
        config.query.default_limit,
        config.query.max_limit,
        config.alerts.default_window_minutes,
        config.alerts.default_error_threshold
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    store.close().await;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState, config: &Config) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/logs",
            get(handlers::logs::list_logs).post(handlers::logs::create_log),
        )
        .route("/alerts", get(handlers::alerts::get_alerts));

    if config.metrics.enabled {
        router = router.route(
            &config.metrics.endpoint,
            get(handlers::metrics_handler::metrics),
        );
    }

    router
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
