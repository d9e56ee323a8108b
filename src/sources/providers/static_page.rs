// src/sources/providers/static_page.rs
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::extract::PriceExtractor;
use crate::sources::fetch::DynFetcher;
use crate::sources::text::html_to_text;
use crate::sources::types::{Observation, PriceSource};

/// One page, full visible text, best price over all candidate sentences.
pub struct StaticPageSource {
    name: String,
    url: String,
    fetcher: DynFetcher,
    extractor: Arc<PriceExtractor>,
}

impl StaticPageSource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        fetcher: DynFetcher,
        extractor: Arc<PriceExtractor>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            fetcher,
            extractor,
        }
    }
}

#[async_trait]
impl PriceSource for StaticPageSource {
    async fn observe(&self) -> Result<Option<Observation>> {
        let html = self
            .fetcher
            .fetch(&self.url)
            .await?
            .into_success_body(&self.url)?;
        let text = html_to_text(&html);
        Ok(self
            .extractor
            .best_price(&text)
            .await
            .map(|price| Observation::new(price, &self.name, &self.url)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
