// src/sources/types.rs
use anyhow::Result;

use crate::price::format_price;

/// One source's price with provenance. Serialized as the public API record.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Observation {
    pub price: u64,
    pub price_text: String, // e.g. "532,400"
    pub source: String,     // e.g. "Dawn News"
    pub url: String,
}

impl Observation {
    pub fn new(price: u64, source: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            price,
            price_text: format_price(price),
            source: source.into(),
            url: url.into(),
        }
    }
}

/// A navigation strategy producing at most one observation.
/// `Err` means the source failed; it never aborts other sources.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    async fn observe(&self) -> Result<Option<Observation>>;
    fn name(&self) -> &str;
}
