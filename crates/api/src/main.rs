//! Helpdesk API server entry point

use anyhow::Context;
use helpdesk_api::{build_state, create_router, AppConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("helpdesk_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    if config.jwt.is_dev_secret() {
        warn!("signing tokens with the built-in development secret; set HELPDESK_JWT__SECRET");
    }

    let state = build_state(&config).await?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("binding {}", config.bind_address))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to install ctrl-c handler: {}", e);
    }
}
