use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use tgr_core::{config::Config, relay::Relay};
use tgr_telegram::TelegramClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tgr_core::logging::init("tgr")?;

    let cfg = Config::load()?;

    let telegram = TelegramClient::new(cfg.telegram_api_base.clone(), cfg.upstream_timeout)?;
    let relay = Relay::new(Arc::new(telegram)).with_default_credential(cfg.bot_token.clone());
    let app = tgr_http::router(relay, cfg.max_upload_bytes);

    let listener = TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;
    tracing::info!("tgr listening on {}", listener.local_addr()?);
    tracing::info!("Upstream: {}", cfg.telegram_api_base);
    match cfg.upstream_timeout {
        Some(t) => tracing::info!("Upstream timeout: {} ms", t.as_millis()),
        None => tracing::info!("Upstream timeout: none"),
    }
    if cfg.bot_token.is_some() {
        tracing::info!("Fallback bot token configured");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    tracing::info!("tgr stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
