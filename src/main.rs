//! Hotlist relay: HTTP entrypoint.
//! Serves the trending-digest routes plus `/metrics` on the Shuttle runtime.

use anyhow::Context;
use shuttle_axum::ShuttleAxum;

use hotlist_relay::api::{create_router, AppState};
use hotlist_relay::config::AppConfig;
use hotlist_relay::metrics::Metrics;
use hotlist_relay::Digest;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    hotlist_relay::init_tracing();

    let cfg = AppConfig::load().context("loading configuration")?;
    let metrics = Metrics::init(&cfg.fetch.policy())?;
    let digest = Digest::from_config(&cfg)?;

    tracing::info!(
        sources = digest.sources().iter().filter(|s| s.enabled).count(),
        webhook = cfg.notify.feishu_webhook.is_some(),
        ai = cfg.ai.is_usable(),
        "hotlist relay starting"
    );

    let router = create_router(AppState::new(digest)).merge(metrics.router());
    Ok(router.into())
}
