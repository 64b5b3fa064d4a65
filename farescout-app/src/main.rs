use std::sync::Arc;

use anyhow::Result;
use farescout_common::observability::{init_logging, LogConfig};
use farescout_config::ScoutConfigLoader;
use farescout_search::BrowserFlightSearch;
use farescout_server::build_router;

#[tokio::main]
async fn main() -> Result<()> {
    // Config first (env wins), then logging.
    let cfg = ScoutConfigLoader::new().with_file("farescout.yaml").load()?;

    let log_path = init_logging(LogConfig {
        emit_stderr: true,
        ..LogConfig::default()
    })?;
    tracing::info!(log = %log_path.display(), "logging initialised");

    let searcher = Arc::new(BrowserFlightSearch::new(
        cfg.webdriver.clone(),
        cfg.search.clone(),
    ));
    let app = build_router(searcher);

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr).await?;
    tracing::info!(addr = %cfg.server.bind_addr, "farescout listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to install ctrl-c handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
