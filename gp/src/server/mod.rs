//! HTTP server for goalplan

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use eyre::{Context, Result};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::plan::PlanPipeline;

pub mod routes;

pub use routes::{ErrorBody, GENERATE_PLAN_PATH, GeneratePlanRequest, HealthResponse};

/// Application state shared across handlers
pub struct AppState {
    pub pipeline: PlanPipeline,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(pipeline: PlanPipeline) -> Self {
        Self {
            pipeline,
            start_time: Instant::now(),
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    debug!(?config, "router: called");
    let mut app = Router::new()
        .merge(routes::plan_routes())
        .merge(routes::health_routes());

    if config.serve_index {
        let index = config.index_path();
        if !index.exists() {
            warn!(path = %index.display(), "Front-end index not found; / will return 404");
        }
        app = app.route_service("/", ServeFile::new(index));
    } else {
        debug!("router: not serving static index");
    }

    let mut app = app.with_state(state).layer(TraceLayer::new_for_http());
    if config.cors {
        app = app.layer(CorsLayer::permissive());
    }
    app
}

/// Run the HTTP server until Ctrl-C
pub async fn run(state: AppState, config: &ServerConfig) -> Result<()> {
    if !state.pipeline.has_credentials() {
        warn!("No LLM API key configured; plan requests will fail until one is set");
    }

    let app = router(Arc::new(state), config);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .context(format!("Failed to bind {}", config.bind))?;
    info!("Listening on http://{}", listener.local_addr().context("Failed to read local address")?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
