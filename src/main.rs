//! Gold Rate Finder binary entrypoint.
//! Boots the Axum HTTP server: config, the shared QA model, sources, routes.

use anyhow::Context;
use gold_rate_finder::api::{self, AppState};
use gold_rate_finder::config::RatesConfig;
use gold_rate_finder::metrics::Metrics;
use gold_rate_finder::qa_bootstrap::QaRuntime;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Local log setup. Shuttle may already own the global subscriber, in which
/// case this is a no-op.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gold_rate_finder=info,rates=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let rates_cfg = RatesConfig::load_default().context("loading rates config")?;

    // Built exactly once; every request shares this model.
    let qa = QaRuntime::from_env().context("initializing QA model")?;
    qa.quick_probe(&rates_cfg.extraction.question).await;

    let aggregator = gold_rate_finder::build_http_aggregator(&rates_cfg, qa.client.clone())
        .context("building rate sources")?;

    let mut router = api::router(AppState::new(aggregator));

    if std::env::var("METRICS_ROUTE").ok().as_deref() == Some("1") {
        let metrics = Metrics::init(&rates_cfg)?;
        router = router.merge(metrics.router());
    }

    Ok(router.into())
}
