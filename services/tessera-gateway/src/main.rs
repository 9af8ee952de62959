//! Gateway entry-point: configuration, tracing, registry wiring, listener.

use std::path::PathBuf;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tessera_gateway::{AppState, GatewayConfig, rest_api};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Optional explicit config file as the first argument; otherwise a
    // `gateway.toml` in the working directory (if any) plus environment.
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = GatewayConfig::load(config_path.as_deref())?;

    let state = AppState::from_config(&config)?;

    // Mirror the fact stream into the log; indexers subscribe the same way.
    let mut facts = state.events.subscribe();
    tokio::spawn(async move {
        while let Ok(fact) = facts.recv().await {
            info!(?fact, "registry fact");
        }
    });

    let app = rest_api::router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "tessera gateway listening");
    axum::serve(listener, app).await?;

    Ok(())
}
