use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use realty_core::config::GatewayConfig;
use realty_server::app_state::AppState;
use realty_server::args::ServerArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = GatewayConfig::from(ServerArgs::parse());

    if config.listings.credential().is_none() {
        tracing::warn!("BAYUT_API_KEY not set; listing search will fail");
    }
    if config.title_registry.credential().is_none() {
        tracing::warn!("DUBAI_REST_API_KEY not set; title verification will fail");
    }

    let state = AppState::from_config(&config).context("Failed to build upstream clients")?;
    let app = realty_server::router::create_router(state);

    let addr = config.bind_addr();
    tracing::info!("Realty gateway listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
