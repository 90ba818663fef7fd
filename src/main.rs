mod config;
mod error;
mod metrics;
mod report;
mod routes;
mod server;
mod state;
mod upstream;

use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

use config::{CliArgs, GatewayConfig};
use state::GatewayState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagespeed_gateway=info,tower_http=info".into()),
        )
        .init();

    let args = CliArgs::parse();
    info!("Starting pagespeed-gateway v{}", env!("CARGO_PKG_VERSION"));

    let config = GatewayConfig::from_args(args);
    if config.api_key.is_none() {
        // Not fatal: requests get a distinct configuration error instead of
        // failing deep inside the upstream call.
        warn!("No PageSpeed API key configured; analysis requests will be rejected");
    }
    let port = config.port;

    let state = Arc::new(GatewayState::new(config));
    let router = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Gateway listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway shutting down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal");
}
