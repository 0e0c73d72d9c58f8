use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use alcatraz_api::{build_router, AppState};
use alcatraz_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("alcatraz=info".parse()?))
        .init();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::from_config(&config));
    info!(events = state.store.len(), "Event store loaded");

    let app = build_router(state);

    let addr = config.bind_addr();
    info!("Alcatraz events API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
