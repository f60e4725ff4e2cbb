mod ai;
mod config;
mod errors;
mod layout;
mod models;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai::{HttpAnalyst, SharedAnalyst, UnconfiguredAnalyst};
use crate::config::Config;
use crate::render::backend::{docx_loader, AcquirePolicy};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize AI collaborator
    let analyst: SharedAnalyst = match &config.ai_endpoint {
        Some(endpoint) => {
            info!("AI collaborator configured at {endpoint}");
            Arc::new(HttpAnalyst::new(endpoint.clone(), config.ai_timeout)?)
        }
        None => {
            warn!("AI_ENDPOINT is not set; AI features will return placeholders");
            Arc::new(UnconfiguredAnalyst)
        }
    };

    // DOCX backend is acquired on first export, not here
    let docx_loader = Arc::new(docx_loader(AcquirePolicy::new(
        config.docx_acquire_timeout,
        config.docx_acquire_attempts,
    )));
    info!(
        "DOCX backend policy: {} attempt(s) per source, {}ms timeout",
        config.docx_acquire_attempts,
        config.docx_acquire_timeout.as_millis()
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        analyst,
        docx_loader,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
