//! scout-chat service entry point.

use anyhow::Result;
use scout_chat::{build_router, AppState, OpenAIClient};
use scout_common::config::Config;
use scout_common::logging::init_logging;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() -> Result<()> {
    let startup_start = std::time::Instant::now();

    let config = Config::load_with_env()?;
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("Scout Chat v{}", env!("CARGO_PKG_VERSION"));

    if config.model.api_key.is_none() {
        tracing::warn!("No API key configured; model requests will be rejected upstream");
    }

    // Create application state
    let client = Arc::new(OpenAIClient::new(&config.model));
    let state = AppState::new(client, config.chat.history_window);

    // Build router with CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(state).layer(cors);

    let addr = SocketAddr::from((config.bind_address().parse::<IpAddr>()?, config.chat_port()));

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
