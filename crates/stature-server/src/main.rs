//! Stature Server Binary
//!
//! Serves the measurement dashboard over HTTP.

use std::sync::Arc;

use stature_core::DashboardConfig;
use stature_server::{serve, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::var("STATURE_CONFIG") {
        Ok(path) => DashboardConfig::load(&path)?,
        Err(_) => DashboardConfig::default(),
    };
    let addr = std::env::var("STATURE_ADDR").unwrap_or_else(|_| config.server.addr.clone());

    let state = Arc::new(AppState::new(config)?);
    serve(&addr, state).await
}
