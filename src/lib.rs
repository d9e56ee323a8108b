// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod extract;
pub mod metrics;
pub mod price;
pub mod qa_bootstrap;
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{collect_rates, RateAggregator, RatesOutcome};
pub use crate::api::router;
pub use crate::extract::qa_adapter;
pub use crate::sources::types::{Observation, PriceSource};

use std::sync::Arc;

use crate::config::RatesConfig;
use crate::extract::{DynQaModel, PriceExtractor};
use crate::sources::fetch::{DynFetcher, HttpFetcher};

/// Wire config + shared QA model + fetcher into the ordered source list.
pub fn build_aggregator(
    cfg: &RatesConfig,
    qa: DynQaModel,
    fetcher: DynFetcher,
) -> anyhow::Result<RateAggregator> {
    let extractor = Arc::new(PriceExtractor::new(qa, cfg)?);
    let sources = sources::build_sources(cfg, fetcher, extractor)?;
    tracing::info!(
        target: "rates",
        sources = sources.len(),
        min = cfg.range.min,
        max = cfg.range.max,
        "rate sources ready"
    );
    Ok(RateAggregator::new(sources))
}

/// Aggregator fetching over real HTTP.
pub fn build_http_aggregator(cfg: &RatesConfig, qa: DynQaModel) -> anyhow::Result<RateAggregator> {
    let fetcher: DynFetcher = Arc::new(HttpFetcher::new(&cfg.http)?);
    build_aggregator(cfg, qa, fetcher)
}
