//! Stature Server - Measurement Dashboard
//!
//! HTTP server that loads a table (uploaded or from a fixed path), runs the
//! analysis pipeline and serves the charts as an HTML page or JSON.

pub mod charts;
pub mod http;
pub mod page;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use stature_core::{Dashboard, DashboardConfig, DashboardResult};

/// Shared application state
///
/// Immutable after startup; every request loads its own table.
pub struct AppState {
    pub config: DashboardConfig,
    pub dashboard: Dashboard,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> DashboardResult<Self> {
        config.validate()?;
        let dashboard = Dashboard::new(&config)?;
        Ok(Self { config, dashboard })
    }
}

/// Create the dashboard router
pub fn create_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.server.max_upload_bytes;

    Router::new()
        // Pages
        .route("/", get(http::index))
        .route("/upload", post(http::upload))
        .route("/preview.svg", get(http::preview_image))
        // JSON endpoints
        .route("/api/analyze", post(http::analyze_upload))
        .route("/api/report", get(http::fixed_report))
        // System endpoints
        .route("/status", get(http::get_status))
        // Middleware
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let source = state.config.source.describe();
    let column = state.config.column.clone();
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%source, %column, "Stature dashboard listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
