// src/aggregate.rs
//! Aggregator: runs every source in order, keeps what succeeded, sorts by
//! price descending. A failing source is logged and skipped.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::sources::types::{Observation, PriceSource};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("rates_requests_total", "Rate collection runs.");
        describe_counter!(
            "rates_observations_total",
            "Observations produced by sources."
        );
        describe_counter!("rates_no_data_total", "Runs where no source found a price.");
        describe_counter!(
            "rates_source_errors_total",
            "Source fetch/parse failures, by source."
        );
        describe_counter!(
            "rates_candidates_total",
            "Candidate sentences sent to QA inference."
        );
        describe_counter!("rates_qa_calls_total", "QA inference calls.");
        describe_counter!("rates_qa_errors_total", "Failed QA inference calls.");
        describe_histogram!("rates_collect_ms", "Full collection time in milliseconds.");
    });
}

/// Result of one collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatesOutcome {
    /// Non-empty, sorted by price descending.
    Found(Vec<Observation>),
    /// Every source failed or found nothing.
    NoData,
}

impl RatesOutcome {
    pub fn observations(&self) -> &[Observation] {
        match self {
            RatesOutcome::Found(v) => v,
            RatesOutcome::NoData => &[],
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, RatesOutcome::NoData)
    }
}

/// JSON body for the empty case: `{"error": "No data found", "data": []}`.
#[derive(Debug, Serialize)]
pub struct NoDataBody {
    pub error: &'static str,
    pub data: Vec<Observation>,
}

impl Default for NoDataBody {
    fn default() -> Self {
        Self {
            error: "No data found",
            data: Vec::new(),
        }
    }
}

/// Stable descending sort by price.
pub fn sort_desc(observations: &mut [Observation]) {
    observations.sort_by(|a, b| b.price.cmp(&a.price));
}

/// Attempt every source sequentially, collect successes, ignore failures.
pub async fn collect_rates(sources: &[Box<dyn PriceSource>]) -> RatesOutcome {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();
    counter!("rates_requests_total").increment(1);

    let mut found = Vec::with_capacity(sources.len());
    for s in sources {
        match s.observe().await {
            Ok(Some(obs)) => {
                tracing::info!(target: "rates", source = s.name(), price = obs.price, url = %obs.url, "observation");
                found.push(obs);
            }
            Ok(None) => {
                tracing::debug!(target: "rates", source = s.name(), "no price found");
            }
            Err(e) => {
                tracing::warn!(target: "rates", error = ?e, source = s.name(), "source error");
                counter!("rates_source_errors_total", "source" => s.name().to_string()).increment(1);
            }
        }
    }

    histogram!("rates_collect_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    if found.is_empty() {
        counter!("rates_no_data_total").increment(1);
        return RatesOutcome::NoData;
    }
    counter!("rates_observations_total").increment(found.len() as u64);
    sort_desc(&mut found);
    RatesOutcome::Found(found)
}

/// Owns the source list for the lifetime of the service.
pub struct RateAggregator {
    sources: Vec<Box<dyn PriceSource>>,
}

impl RateAggregator {
    pub fn new(sources: Vec<Box<dyn PriceSource>>) -> Self {
        Self { sources }
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    pub async fn collect(&self) -> RatesOutcome {
        collect_rates(&self.sources).await
    }
}
