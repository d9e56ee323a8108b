// src/extract/mod.rs
//! Extraction engine: candidate units -> QA answer -> normalized, range-gated price.

pub mod candidates;
pub mod qa_adapter;

use anyhow::Result;
use metrics::counter;
use tracing::{debug, warn};

pub use crate::extract::candidates::{split_units, CandidateFilter};
pub use crate::extract::qa_adapter::{DynQaModel, QaAnswer, QaModel};

use crate::config::RatesConfig;
use crate::price::{clean_price, PriceRange};

/// Holds the shared QA model plus the domain knobs it is queried with.
pub struct PriceExtractor {
    qa: DynQaModel,
    question: String,
    range: PriceRange,
    filter: CandidateFilter,
}

impl PriceExtractor {
    pub fn new(qa: DynQaModel, cfg: &RatesConfig) -> Result<Self> {
        Ok(Self {
            qa,
            question: cfg.extraction.question.clone(),
            range: cfg.range,
            filter: CandidateFilter::new(&cfg.candidates, cfg.range)?,
        })
    }

    /// Query QA on one unit. `Ok(None)` when the answer is not a plausible
    /// price; `Err` only when the inference call itself failed.
    pub async fn extract_unit(&self, unit: &str) -> Result<Option<u64>> {
        counter!("rates_qa_calls_total").increment(1);
        let answer = self.qa.answer(&self.question, unit).await?;
        let price = clean_price(Some(&answer.answer));
        debug!(
            target: "rates",
            answer = %answer.answer,
            score = ?answer.score,
            price,
            "qa answer"
        );
        Ok(self.range.accept(price))
    }

    /// Max accepted price over every candidate unit of `text`.
    ///
    /// Taking the maximum (not the first) is a domain heuristic: sources
    /// restate the quote per gram and per 10 grams, and the larger figure is
    /// the per-tola market rate they headline. It can also let an unrelated
    /// in-range number win.
    pub async fn best_price(&self, text: &str) -> Option<u64> {
        let mut best: Option<u64> = None;
        for unit in self.filter.candidates(text) {
            counter!("rates_candidates_total").increment(1);
            match self.extract_unit(unit).await {
                Ok(Some(price)) => best = Some(best.map_or(price, |b| b.max(price))),
                Ok(None) => {}
                Err(e) => {
                    counter!("rates_qa_errors_total").increment(1);
                    warn!(target: "rates", error = ?e, provider = self.qa.provider_name(), "qa call failed; skipping unit");
                }
            }
        }
        best
    }
}
