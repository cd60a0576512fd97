//! SantéRisk Scoring Server
//!
//! HTTP front for the scoring engine. The model is loaded once at
//! startup and shared read-only by every request; scoring runs on the
//! blocking pool.
//!
//! # Routes
//!
//! ```text
//! GET  /health
//! GET  /api/v1/model               model status, layout, threshold range
//! GET  /api/v1/model/importances   coefficient importances
//! POST /api/v1/predict             JSON record → probability + class
//! POST /api/v1/batch               CSV body → JSON rows + summary
//! POST /api/v1/batch/csv           CSV body → scored CSV download
//! ```

mod config;
mod error;
mod handlers;
mod models;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use santerisk_core::RiskService;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "santerisk_server=debug,santerisk_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("SantéRisk server starting ({})...", config.environment);

    // Load the model once
    let service = RiskService::from_path(&config.model_path);
    tracing::info!("{}", service.model().status_message());

    // Build application state
    let state = AppState {
        service: Arc::new(service),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RiskService>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/model", get(handlers::model::status))
        .route("/api/v1/model/importances", get(handlers::model::importances))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/batch", post(handlers::batch::score))
        .route("/api/v1/batch/csv", post(handlers::batch::download))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
