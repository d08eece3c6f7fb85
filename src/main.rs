// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::application::table_cache::{CachePolicy, SystemClock, TableCache};
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::csv_repository::CsvInventoryRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dashboard, health_check, list_categories, stream_dashboard};

fn build_router(state: Arc<AppState>) -> Router {
    // Responses are compressed in our own builders, so no CompressionLayer
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/categories", get(list_categories))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(CsvInventoryRepository::new(
        &config.data.primary_encoding,
        &config.data.fallback_encoding,
        config.data.delimiter_byte()?,
    )?);

    // Create services (application layer)
    let cache = TableCache::new(
        repository,
        Arc::new(SystemClock),
        CachePolicy::from_ttl(config.cache.ttl()?),
    );
    let dashboard_service = DashboardService::new(cache, config.data.path.clone(), config.labels);
    let streaming_service = StreamingDashboardService::new(dashboard_service.clone());

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        streaming_service,
    });

    // Start server
    let addr = config.server.socket_addr()?;
    tracing::info!(
        "Starting inventory-dashboard on {} (data: {})",
        addr,
        config.data.path.display()
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, build_router(state)).await?;

    Ok(())
}
