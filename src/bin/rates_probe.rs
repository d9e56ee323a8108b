//! One-shot run: collect rates from every configured source and print the
//! same JSON the `/api/rates` endpoint returns.

use gold_rate_finder::aggregate::{NoDataBody, RatesOutcome};
use gold_rate_finder::config::RatesConfig;
use gold_rate_finder::qa_bootstrap::QaRuntime;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rates=info,warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = RatesConfig::load_default()?;
    let qa = QaRuntime::from_env()?;
    let aggregator = gold_rate_finder::build_http_aggregator(&cfg, qa.client.clone())?;

    let json = match aggregator.collect().await {
        RatesOutcome::Found(rates) => serde_json::to_string_pretty(&rates)?,
        RatesOutcome::NoData => serde_json::to_string_pretty(&NoDataBody::default())?,
    };
    println!("{json}");
    Ok(())
}
