// Valuation service entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config
// 3. Warn if no provider API key is configured (not a hard failure)
// 4. Build the gateway and orchestrator
// 5. Serve HTTP until stopped

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use valuation_service::config;
use valuation_service::gateway::Gateway;
use valuation_service::orchestrator::Orchestrator;
use valuation_service::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    info!("valuation service starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "config loaded: provider={}, bind={}",
        config.provider.base_url, config.server.bind
    );

    // Startup diagnostic only; per-request logic never checks this.
    if !config.credentials.has_api_key() {
        warn!("no provider API key configured; upstream lookups will fail");
    }

    let gateway = Gateway::new(
        &config.provider.base_url,
        config.credentials.api_key.as_deref().unwrap_or(""),
        config.provider.timeout(),
    )
    .context("failed to build the upstream HTTP client")?;

    let state = Arc::new(AppState {
        orchestrator: Orchestrator::new(gateway),
    });

    server::serve(&config.server.bind, state).await
}

fn init_tracing() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("valuation_service=info,tower_http=info,warn")),
        )
        .with_target(true)
        .init();
}
