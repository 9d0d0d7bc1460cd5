//! Newswire — binary entrypoint.
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::net::SocketAddr;
use std::time::Duration;

use newswire::{api, config::AppConfig, fetch::Aggregator, metrics::Metrics};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Upstream calls get a hard request timeout so a hung provider cannot
/// stall requests forever.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newswire=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env()?;
    let metrics = Metrics::init(cfg.cache_ttl_secs);

    // One HTTP client shared by every adapter.
    let client = reqwest::Client::builder()
        .timeout(PROVIDER_TIMEOUT)
        .build()?;

    let aggregator = Aggregator::from_config(&cfg, client);
    let state = api::AppState::new(&cfg, aggregator);
    let app = api::router(state).merge(metrics.router());

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server running");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
